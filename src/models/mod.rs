//! Request and response models for the HTTP API.

mod query_request;
mod query_response;

pub use query_request::QueryRequest;
pub use query_response::{ErrorDetail, ErrorResponse, QueryResponse};
