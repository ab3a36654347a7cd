//! Schema discovery handlers for `GET /api/tables` and
//! `GET /api/tables/{table_name}/schema`.

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use crate::context::GatewayContext;
use crate::error::GatewayError;

/// Query parameters of the table listing.
#[derive(Debug, Deserialize)]
pub struct ListTablesParams {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Rows per page; clamped server-side to the configured maximum.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

/// GET /api/tables?page=&page_size= - paginated table listing.
#[get("/tables")]
pub async fn list_tables(
    context: web::Data<Arc<GatewayContext>>,
    params: web::Query<ListTablesParams>,
) -> Result<HttpResponse, GatewayError> {
    let page = context
        .inspector()
        .list_tables(params.page, params.page_size)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/tables/{table_name}/schema - column and index descriptors for
/// one table; 404 when the table does not exist.
#[get("/tables/{table_name}/schema")]
pub async fn get_table_schema(
    context: web::Data<Arc<GatewayContext>>,
    path: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let table_name = path.into_inner();
    let schema = context.inspector().table_schema(&table_name).await?;
    Ok(HttpResponse::Ok().json(schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default_to_first_page_of_ten() {
        let params: ListTablesParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, 10);
    }
}
