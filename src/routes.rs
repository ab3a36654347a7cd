//! HTTP route registration.
//!
//! - `GET  /`                          - service identity
//! - `GET  /health`                    - store connectivity probe
//! - `POST /api/query`                 - structured query result
//! - `POST /api/query/markdown`        - Markdown query result
//! - `GET  /api/tables`                - paginated table listing
//! - `GET  /api/tables/{name}/schema`  - table schema

use actix_web::web;

use crate::handlers;

/// Register all gateway routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::root)
        .service(handlers::health_check)
        .service(
            web::scope("/api")
                .service(handlers::execute_query)
                .service(handlers::execute_query_markdown)
                .service(handlers::list_tables)
                .service(handlers::get_table_schema),
        );
}
