//! sqlgate — a read-only SQL query gateway for PostgreSQL.
//!
//! The gateway accepts raw SQL text over HTTP, enforces a read-only policy
//! before anything reaches the database, executes validated statements over
//! a pooled connection with bounded result size, and renders results either
//! as structured JSON or as a Markdown document. Independent of the query
//! path, a schema inspector exposes paginated table listings and per-table
//! column/index metadata for discovery.

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod format;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod routes;
pub mod schema;
pub mod validator;
pub mod value;

mod handlers;

pub use config::GatewayConfig;
pub use context::GatewayContext;
pub use error::GatewayError;
