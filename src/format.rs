//! Rendering of a query result as a Markdown document.
//!
//! The tabular form mirrors the structured form exactly: same row count,
//! same column order. NULL is rendered as an explicit `*NULL*` marker so it
//! can never be confused with an empty string, and booleans become ✅/❌.

use serde_json::Value as JsonValue;

use crate::models::QueryResponse;

/// Render a query result as a Markdown document with a header stating the
/// original query and row count, followed by one table row per result row.
pub fn render_markdown(result: &QueryResponse) -> String {
    let query = result.query.as_deref().unwrap_or("N/A");

    if result.row_count == 0 {
        return format!(
            "# SQL Query Result\n\n**Query:** `{query}`\n\n**Result:** No rows returned\n"
        );
    }

    let mut md = String::new();
    md.push_str("# SQL Query Result\n\n");
    md.push_str(&format!("**Query:** `{query}`\n\n"));
    md.push_str(&format!("**Rows returned:** {}\n\n", result.row_count));
    md.push_str("---\n\n");

    md.push_str("| ");
    md.push_str(&result.columns.join(" | "));
    md.push_str(" |\n");
    md.push('|');
    md.push_str(&vec!["---"; result.columns.len()].join("|"));
    md.push_str("|\n");

    for row in &result.rows {
        let cells: Vec<String> = result
            .columns
            .iter()
            .map(|column| render_cell(row.get(column).unwrap_or(&JsonValue::Null)))
            .collect();
        md.push_str("| ");
        md.push_str(&cells.join(" | "));
        md.push_str(" |\n");
    }

    md
}

fn render_cell(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "*NULL*".to_string(),
        JsonValue::Bool(true) => "✅".to_string(),
        JsonValue::Bool(false) => "❌".to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(_) | JsonValue::Object(_) => serde_json::to_string(value)
            .map(|json| format!("`{json}`"))
            .unwrap_or_else(|_| "*unrenderable*".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::QueryOutput;
    use serde_json::json;
    use std::collections::HashMap;

    fn response(columns: &[&str], rows: Vec<Vec<JsonValue>>, query: &str) -> QueryResponse {
        let rows = rows
            .into_iter()
            .map(|values| {
                columns
                    .iter()
                    .map(|c| c.to_string())
                    .zip(values)
                    .collect::<HashMap<_, _>>()
            })
            .collect();
        QueryResponse::from_output(
            QueryOutput {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
            },
            query,
        )
    }

    #[test]
    fn renders_header_and_table() {
        let result = response(
            &["currency_code", "currency_name", "symbol"],
            vec![vec![json!("RUB"), json!("Российский рубль"), json!("₽")]],
            "SELECT * FROM dict_currencies LIMIT 5",
        );
        let md = render_markdown(&result);

        assert!(md.starts_with("# SQL Query Result"));
        assert!(md.contains("**Query:** `SELECT * FROM dict_currencies LIMIT 5`"));
        assert!(md.contains("**Rows returned:** 1"));
        assert!(md.contains("| currency_code | currency_name | symbol |"));
        assert!(md.contains("|---|---|---|"));
        assert!(md.contains("| RUB | Российский рубль | ₽ |"));
    }

    #[test]
    fn zero_rows_renders_short_document() {
        let result = response(&["id"], vec![], "SELECT * FROM empty");
        let md = render_markdown(&result);
        assert!(md.contains("No rows returned"));
        assert!(!md.contains("|---|"));
        // Empty results drop the echoed query, so the header shows N/A.
        assert!(md.contains("`N/A`"));
    }

    #[test]
    fn null_is_distinct_from_empty_string() {
        let result = response(
            &["a", "b"],
            vec![vec![JsonValue::Null, json!("")]],
            "SELECT a, b FROM t",
        );
        let md = render_markdown(&result);
        assert!(md.contains("| *NULL* |  |"));
    }

    #[test]
    fn booleans_render_as_markers() {
        let result = response(
            &["ok", "bad"],
            vec![vec![json!(true), json!(false)]],
            "SELECT ok, bad FROM t",
        );
        let md = render_markdown(&result);
        assert!(md.contains("| ✅ | ❌ |"));
    }

    #[test]
    fn json_values_render_as_inline_code() {
        let result = response(
            &["meta"],
            vec![vec![json!({"tag": "x"})]],
            "SELECT meta FROM t",
        );
        let md = render_markdown(&result);
        assert!(md.contains(r#"`{"tag":"x"}`"#));
    }

    #[test]
    fn tabular_form_agrees_with_structured_form() {
        let result = response(
            &["z_last", "a_first"],
            vec![
                vec![json!(1), json!("x")],
                vec![json!(2), json!("y")],
                vec![json!(3), json!("z")],
            ],
            "SELECT z_last, a_first FROM t",
        );
        let md = render_markdown(&result);

        // Row count agrees: header rows (title lines + table header + separator)
        // plus exactly row_count data rows.
        let data_rows = md.lines().filter(|l| l.starts_with("| ") && !l.contains("z_last")).count();
        assert_eq!(data_rows, result.row_count);

        // Column order agrees with the structured form, not alphabetical order.
        assert!(md.contains("| z_last | a_first |"));
        let header_pos = md.find("| z_last").unwrap();
        let first_row_pos = md.find("| 1 | x |").unwrap();
        assert!(header_pos < first_row_pos);
    }
}
