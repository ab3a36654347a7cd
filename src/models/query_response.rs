//! Query response models
//!
//! Structured record form of a query result, plus the uniform error body
//! every failing endpoint returns.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::executor::QueryOutput;

/// Structured result of one executed query.
///
/// # Example
/// ```json
/// {
///   "columns": ["currency_code", "currency_name", "symbol"],
///   "rows": [{"currency_code": "RUB", "currency_name": "Российский рубль", "symbol": "₽"}],
///   "row_count": 1,
///   "query": "SELECT * FROM dict_currencies LIMIT 1"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Column names, order-significant, matching the store's wire order.
    pub columns: Vec<String>,

    /// One map per result row, keyed by column name.
    pub rows: Vec<HashMap<String, JsonValue>>,

    /// Number of rows returned (after the executor's cap).
    pub row_count: usize,

    /// The original query text, echoed back for non-empty results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Informational message for empty results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl QueryResponse {
    /// Build the response for an executed statement.
    pub fn from_output(output: QueryOutput, query: &str) -> Self {
        if output.rows.is_empty() {
            return Self {
                columns: Vec::new(),
                rows: Vec::new(),
                row_count: 0,
                query: None,
                message: Some(
                    "Query executed successfully but returned no rows".to_string(),
                ),
            };
        }
        Self {
            row_count: output.rows.len(),
            columns: output.columns,
            rows: output.rows,
            query: Some(query.to_string()),
            message: None,
        }
    }
}

/// Uniform JSON error body.
///
/// # Example
/// ```json
/// {
///   "status": "error",
///   "error": {
///     "code": "QUERY_REJECTED",
///     "message": "Query contains forbidden keyword: DELETE"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always "error".
    pub status: String,
    pub error: ErrorDetail,
}

/// Machine-readable code plus human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            status: "error".to_string(),
            error: ErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_output() -> QueryOutput {
        let mut row = HashMap::new();
        row.insert("id".to_string(), json!(1));
        row.insert("name".to_string(), json!("Alice"));
        QueryOutput {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![row],
        }
    }

    #[test]
    fn echoes_query_for_non_empty_result() {
        let response = QueryResponse::from_output(sample_output(), "SELECT * FROM users");
        assert_eq!(response.row_count, 1);
        assert_eq!(response.columns, vec!["id", "name"]);
        assert_eq!(response.query.as_deref(), Some("SELECT * FROM users"));
        assert!(response.message.is_none());
    }

    #[test]
    fn empty_result_carries_message_not_query() {
        let output = QueryOutput {
            columns: vec!["id".to_string()],
            rows: Vec::new(),
        };
        let response = QueryResponse::from_output(output, "SELECT * FROM empty_table");
        assert_eq!(response.row_count, 0);
        assert!(response.columns.is_empty());
        assert!(response.query.is_none());
        assert!(response.message.unwrap().contains("no rows"));
    }

    #[test]
    fn error_response_serializes_uniform_shape() {
        let body = ErrorResponse::new("QUERY_REJECTED", "Only SELECT queries are allowed");
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""status":"error""#));
        assert!(json.contains("QUERY_REJECTED"));
        assert!(json.contains("Only SELECT"));
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let response = QueryResponse::from_output(sample_output(), "SELECT 1");
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("message"));
    }
}
