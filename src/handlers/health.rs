//! Health endpoints.

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

use crate::context::GatewayContext;

/// GET / - service identity, no store contact.
#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "sqlgate",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health - round-trips `SELECT 1` through the pool.
///
/// Degrades to an `unhealthy` body rather than a 5xx so load balancers and
/// the agent layer can distinguish "gateway down" from "store unreachable".
#[get("/health")]
pub async fn health_check(context: web::Data<Arc<GatewayContext>>) -> impl Responder {
    match context.executor().ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "database": "connected",
        })),
        Err(e) => HttpResponse::Ok().json(json!({
            "status": "unhealthy",
            "database": "disconnected",
            "error": e.to_string(),
        })),
    }
}
