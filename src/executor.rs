//! Query execution over a pooled Postgres connection.
//!
//! The executor only ever sees statements that passed the validator, but it
//! does not trust that alone: every pooled connection is switched to
//! read-only transactions and given a server-side statement timeout when it
//! is established, so a policy bypass is still blocked by the store itself.

use futures_util::TryStreamExt;
use log::{debug, warn};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor as _, PgPool};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::{GatewayConfig, LimitsSettings};
use crate::error::GatewayError;
use crate::value;

/// Materialized result of one executed statement: ordered column names plus
/// rows as column → value maps. Bounded by the configured row cap.
#[derive(Debug, Clone)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<HashMap<String, JsonValue>>,
}

impl QueryOutput {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Build the connection pool for the external store.
///
/// The pool connects lazily; `lifecycle::bootstrap` pings it once so a bad
/// configuration fails at startup rather than on the first request. The
/// `after_connect` hook hardens every session:
///   - `default_transaction_read_only = on` blocks writes at the store even
///     if a statement slipped past the validator,
///   - `statement_timeout` bounds execution server-side in addition to the
///     client-side budget.
pub fn connect_pool(config: &GatewayConfig) -> PgPool {
    let db = &config.database;
    let options = PgConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .database(&db.database)
        .username(&db.user)
        .password(&db.password);

    let statement_timeout_ms = config.limits.statement_timeout_ms;

    PgPoolOptions::new()
        .min_connections(db.min_connections)
        .max_connections(db.max_connections)
        .acquire_timeout(Duration::from_millis(config.limits.acquire_timeout_ms))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                conn.execute("SET default_transaction_read_only = on").await?;
                let timeout_sql = format!("SET statement_timeout = {statement_timeout_ms}");
                conn.execute(timeout_sql.as_str()).await?;
                Ok(())
            })
        })
        .connect_lazy_with(options)
}

/// Runs validated statements against the store.
#[derive(Clone)]
pub struct QueryExecutor {
    pool: PgPool,
    limits: LimitsSettings,
}

impl QueryExecutor {
    pub fn new(pool: PgPool, limits: LimitsSettings) -> Self {
        Self { pool, limits }
    }

    /// Execute a validated statement and materialize up to `max_rows` rows.
    ///
    /// Rows beyond the cap are not fetched; truncation is logged, not an
    /// error. On timeout the in-flight fetch is dropped, which returns the
    /// connection to the pool, and the caller sees `Timeout`.
    pub async fn run_query(&self, sql: &str) -> Result<QueryOutput, GatewayError> {
        let start = Instant::now();
        let budget_ms = self.limits.statement_timeout_ms;
        let budget = Duration::from_millis(budget_ms);

        let mut conn = self.pool.acquire().await.map_err(GatewayError::from_sqlx)?;
        let max_rows = self.limits.max_rows;

        let fetch = async {
            let mut stream = sqlx::query(sql).fetch(&mut *conn);
            let mut columns: Vec<String> = Vec::new();
            let mut rows: Vec<HashMap<String, JsonValue>> = Vec::new();
            let mut truncated = false;

            while let Some(row) = stream.try_next().await.map_err(GatewayError::from_sqlx)? {
                if columns.is_empty() {
                    columns = value::column_names(&row);
                }
                if rows.len() >= max_rows {
                    truncated = true;
                    break;
                }
                rows.push(value::decode_row(&row));
            }

            Ok::<_, GatewayError>((columns, rows, truncated))
        };

        let (columns, rows, truncated) = tokio::time::timeout(budget, fetch)
            .await
            .map_err(|_| GatewayError::Timeout { budget_ms })??;

        if truncated {
            warn!(
                "Query result truncated at {} rows (row cap); sql={}",
                max_rows,
                sql.chars().take(120).collect::<String>()
            );
        }
        debug!(
            "Query returned {} rows in {:.2}ms",
            rows.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(QueryOutput { columns, rows })
    }

    /// Liveness probe: a round trip of `SELECT 1`.
    pub async fn ping(&self) -> Result<(), GatewayError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(GatewayError::from_sqlx)
    }

    pub fn limits(&self) -> &LimitsSettings {
        &self.limits
    }
}
