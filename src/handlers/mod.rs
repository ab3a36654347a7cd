//! HTTP request handlers.

mod health;
mod query;
mod tables;

pub use health::{health_check, root};
pub use query::{execute_query, execute_query_markdown};
pub use tables::{get_table_schema, list_tables};
