//! Materialization of Postgres row values into a language-agnostic scalar
//! model carried as `serde_json::Value`:
//!
//!   null, boolean, integer, floating-point, decimal-as-string, text,
//!   ISO-8601 timestamps, and JSON/JSONB passed through as parsed
//!   structures.
//!
//! Decoding is driven by the Postgres type name, with a short generic
//! decode ladder as a fallback for types outside the model.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use uuid::Uuid;
use std::collections::HashMap;

/// Decode one row into a column-name → value map.
pub fn decode_row(row: &PgRow) -> HashMap<String, JsonValue> {
    let mut out = HashMap::with_capacity(row.columns().len());
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_cell(row, idx, column.type_info().name());
        out.insert(column.name().to_string(), value);
    }
    out
}

/// Column names of a row, in wire order.
pub fn column_names(row: &PgRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

fn decode_cell(row: &PgRow, idx: usize, type_name: &str) -> JsonValue {
    match type_name {
        "BOOL" => opt(row.try_get::<Option<bool>, _>(idx)).map(JsonValue::Bool),
        "INT2" => opt(row.try_get::<Option<i16>, _>(idx)).map(|v| JsonValue::from(i64::from(v))),
        "INT4" => opt(row.try_get::<Option<i32>, _>(idx)).map(|v| JsonValue::from(i64::from(v))),
        "INT8" => opt(row.try_get::<Option<i64>, _>(idx)).map(JsonValue::from),
        "FLOAT4" => opt(row.try_get::<Option<f32>, _>(idx))
            .and_then(|v| serde_json::Number::from_f64(f64::from(v)))
            .map(JsonValue::Number),
        "FLOAT8" => opt(row.try_get::<Option<f64>, _>(idx))
            .and_then(serde_json::Number::from_f64)
            .map(JsonValue::Number),
        // Exact numerics stay exact by travelling as strings.
        "NUMERIC" => opt(row.try_get::<Option<Decimal>, _>(idx))
            .map(|d| JsonValue::String(d.to_string())),
        "TEXT" | "VARCHAR" | "CHAR" | "NAME" => {
            opt(row.try_get::<Option<String>, _>(idx)).map(JsonValue::String)
        }
        "DATE" => opt(row.try_get::<Option<NaiveDate>, _>(idx))
            .map(|d| JsonValue::String(d.format("%Y-%m-%d").to_string())),
        "TIME" => opt(row.try_get::<Option<NaiveTime>, _>(idx))
            .map(|t| JsonValue::String(t.format("%H:%M:%S%.f").to_string())),
        "TIMESTAMP" => opt(row.try_get::<Option<NaiveDateTime>, _>(idx))
            .map(|dt| JsonValue::String(format!("{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")))),
        "TIMESTAMPTZ" => opt(row.try_get::<Option<DateTime<Utc>>, _>(idx))
            .map(|dt| JsonValue::String(dt.to_rfc3339())),
        "UUID" => opt(row.try_get::<Option<Uuid>, _>(idx))
            .map(|u| JsonValue::String(u.to_string())),
        // Free-form metadata columns keep their structure.
        "JSON" | "JSONB" => opt(row.try_get::<Option<JsonValue>, _>(idx)),
        _ => return decode_fallback(row, idx),
    }
    .unwrap_or(JsonValue::Null)
}

/// Flatten a `try_get` result; decode failures degrade to NULL rather than
/// failing the whole query.
fn opt<T>(result: Result<Option<T>, sqlx::Error>) -> Option<T> {
    result.ok().flatten()
}

/// Generic decode ladder for types outside the scalar model.
fn decode_fallback(row: &PgRow, idx: usize) -> JsonValue {
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(JsonValue::String).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(JsonValue::from).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v
            .and_then(serde_json::Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return v.map(JsonValue::Bool).unwrap_or(JsonValue::Null);
    }
    JsonValue::Null
}
