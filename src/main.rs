// sqlgate server entrypoint
//!
//! The heavy lifting (pool bootstrap, HTTP wiring) lives in dedicated
//! modules so this file remains a thin orchestrator.

use anyhow::Result;
use log::info;

use sqlgate::{lifecycle, logging, GatewayConfig};

#[actix_web::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = match GatewayConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: failed to load {}: {}", config_path, e);
            std::process::exit(1);
        }
    };

    logging::init_logging(
        &config.logging.level,
        &config.logging.file_path,
        config.logging.log_to_console,
        &config.logging.targets,
        &config.logging.format,
    )?;

    info!("sqlgate v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Host: {}  Port: {}",
        config.server.host, config.server.port
    );

    let context = lifecycle::bootstrap(&config).await?;
    lifecycle::run(&config, context).await
}
