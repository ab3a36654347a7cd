// Error types module
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Main error type for the gateway.
///
/// Every failure a caller can observe maps onto one of these variants, and
/// each variant carries a stable machine-readable code plus a human-readable
/// message. Internal faults (serialization bugs and the like) are kept
/// separate from store-reported faults.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The statement failed the read-only policy check.
    #[error("{0}")]
    Rejected(String),

    /// A schema object the caller named does not exist.
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// Execution exceeded the configured budget.
    #[error("Query exceeded the execution budget of {budget_ms}ms")]
    Timeout { budget_ms: u64 },

    /// The store reported a runtime or syntax fault. The message is the
    /// store's own, verbatim.
    #[error("SQL execution error: {0}")]
    Execution(String),

    /// No pooled connection became available within the wait budget.
    #[error("Connection pool exhausted: {0}")]
    PoolExhausted(String),

    /// A fault inside the gateway itself, never the store.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Stable error code for the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Rejected(_) => "QUERY_REJECTED",
            GatewayError::TableNotFound(_) => "TABLE_NOT_FOUND",
            GatewayError::Timeout { .. } => "TIMEOUT",
            GatewayError::Execution(_) => "EXECUTION_ERROR",
            GatewayError::PoolExhausted(_) => "POOL_EXHAUSTED",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Normalize a sqlx error into the gateway taxonomy.
    ///
    /// Database-reported faults keep the server's message verbatim; pool
    /// acquisition failures become `PoolExhausted`; everything else is a
    /// generic execution failure.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => GatewayError::PoolExhausted(
                "no connection became available within the wait budget".to_string(),
            ),
            sqlx::Error::PoolClosed => {
                GatewayError::PoolExhausted("connection pool is closed".to_string())
            }
            sqlx::Error::Database(db) => GatewayError::Execution(db.message().to_string()),
            other => GatewayError::Execution(other.to_string()),
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Rejected(_) => StatusCode::BAD_REQUEST,
            GatewayError::TableNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Timeout { .. }
            | GatewayError::Execution(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::PoolExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.code(), &self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            GatewayError::Rejected("no".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::TableNotFound("t".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::Timeout { budget_ms: 1000 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::Execution("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::PoolExhausted("busy".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(GatewayError::Rejected("x".into()).code(), "QUERY_REJECTED");
        assert_eq!(
            GatewayError::Timeout { budget_ms: 5 }.code(),
            "TIMEOUT"
        );
        assert_eq!(
            GatewayError::Internal("bug".into()).code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn timeout_message_names_budget() {
        let err = GatewayError::Timeout { budget_ms: 30_000 };
        assert!(err.to_string().contains("30000ms"));
    }
}
