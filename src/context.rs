//! Shared per-process state handed to every handler.

use sqlx::PgPool;

use crate::config::GatewayConfig;
use crate::executor::QueryExecutor;
use crate::schema::SchemaInspector;

/// Application context: configuration plus the pooled store access shared
/// by all requests. Stateless beyond the pool itself.
pub struct GatewayContext {
    config: GatewayConfig,
    executor: QueryExecutor,
    inspector: SchemaInspector,
}

impl GatewayContext {
    pub fn new(config: GatewayConfig, pool: PgPool) -> Self {
        let executor = QueryExecutor::new(pool.clone(), config.limits.clone());
        let inspector = SchemaInspector::new(pool, config.limits.max_page_size);
        Self {
            config,
            executor,
            inspector,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    pub fn inspector(&self) -> &SchemaInspector {
        &self.inspector
    }
}
