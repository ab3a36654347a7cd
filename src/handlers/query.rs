//! Query execution handlers for `POST /api/query` and
//! `POST /api/query/markdown`.

use actix_web::{post, web, HttpResponse};
use log::debug;
use std::sync::Arc;
use std::time::Instant;

use crate::context::GatewayContext;
use crate::error::GatewayError;
use crate::format;
use crate::models::{QueryRequest, QueryResponse};
use crate::validator;

/// POST /api/query - validate and execute a SELECT statement, returning the
/// structured record form.
///
/// The validator runs before anything touches the store: a rejected
/// statement answers 400 without ever acquiring a connection.
#[post("/query")]
pub async fn execute_query(
    context: web::Data<Arc<GatewayContext>>,
    request: web::Json<QueryRequest>,
) -> Result<HttpResponse, GatewayError> {
    let response = run(&context, &request.query).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/query/markdown - same pipeline, rendered as a Markdown
/// document instead of JSON.
#[post("/query/markdown")]
pub async fn execute_query_markdown(
    context: web::Data<Arc<GatewayContext>>,
    request: web::Json<QueryRequest>,
) -> Result<HttpResponse, GatewayError> {
    let response = run(&context, &request.query).await?;
    let markdown = format::render_markdown(&response);
    Ok(HttpResponse::Ok()
        .content_type("text/markdown; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "inline; filename=query_result.md",
        ))
        .body(markdown))
}

async fn run(context: &GatewayContext, query: &str) -> Result<QueryResponse, GatewayError> {
    validator::validate(query)?;

    let start = Instant::now();
    let output = context.executor().run_query(query).await?;
    debug!(
        target: "sql::exec",
        "Query executed | rows={} | took={:.2}ms",
        output.row_count(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(QueryResponse::from_output(output, query))
}
