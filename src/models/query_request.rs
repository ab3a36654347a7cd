//! Query request model
//!
//! Body of `POST /api/query` and `POST /api/query/markdown`.

use serde::{Deserialize, Serialize};

/// Request payload carrying the raw SQL text to execute.
///
/// # Example
/// ```json
/// {
///   "query": "SELECT * FROM dict_currencies LIMIT 5"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// A single SELECT statement. Anything else is rejected before it
    /// reaches the database.
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let json = r#"{"query": "SELECT * FROM users"}"#;
        let request: QueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.query, "SELECT * FROM users");

        let back = serde_json::to_string(&request).unwrap();
        assert!(back.contains("SELECT * FROM users"));
    }

    #[test]
    fn missing_query_field_is_an_error() {
        assert!(serde_json::from_str::<QueryRequest>("{}").is_err());
    }
}
