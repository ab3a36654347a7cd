//! Server lifecycle management helpers.
//!
//! Bootstraps the connection pool and wires the HTTP server so `main.rs`
//! stays a thin orchestrator.

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use log::{info, warn};
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::context::GatewayContext;
use crate::executor;
use crate::routes;

/// Build the pool and shared context, then verify store connectivity.
///
/// The pool itself connects lazily; the explicit ping here makes a bad
/// database configuration fail at startup instead of on the first request.
pub async fn bootstrap(config: &GatewayConfig) -> Result<Arc<GatewayContext>> {
    let pool = executor::connect_pool(config);
    let context = Arc::new(GatewayContext::new(config.clone(), pool));

    context
        .executor()
        .ping()
        .await
        .with_context(|| {
            format!(
                "could not reach database {}:{}/{}",
                config.database.host, config.database.port, config.database.database
            )
        })?;
    info!(
        "Connected to database {}:{}/{}",
        config.database.host, config.database.port, config.database.database
    );

    Ok(context)
}

/// Run the HTTP server until a termination signal is received.
pub async fn run(config: &GatewayConfig, context: Arc<GatewayContext>) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let workers = if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    };

    info!("Starting HTTP server on {} ({} workers)", bind_addr, workers);
    info!(
        "Limits: max_rows={}, statement_timeout={}ms, max_page_size={}",
        config.limits.max_rows, config.limits.statement_timeout_ms, config.limits.max_page_size
    );
    if config.database.password.is_empty() {
        warn!("Database password is empty; set DATABASE_PASSWORD if the store requires one");
    }

    let server_context = context.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            // The gateway sits behind the agent layer and browser-based
            // visualizers alike, so CORS stays open.
            .wrap(Cors::permissive())
            .app_data(web::Data::new(server_context.clone()))
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)
    .with_context(|| format!("failed to bind {bind_addr}"))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
