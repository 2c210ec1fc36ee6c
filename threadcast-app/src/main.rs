use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use threadcast_common::observability::{LogConfig, init_logging};
use threadcast_config::load_dotenv;

mod web;
mod wiring;

/// Turn an article URL into a posted tweet thread.
#[derive(Debug, Parser)]
#[command(name = "threadcast", version, about)]
struct Cli {
    /// YAML configuration file; skipped when it does not exist.
    #[arg(long, env = "THREADCAST_CONFIG", default_value = "threadcast.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = load_dotenv();
    let cli = Cli::parse();

    let log_path = init_logging(LogConfig::default())?;
    tracing::info!(log = %log_path.display(), dotenv = ?dotenv, config = %cli.config.display(), "threadcast.start");

    let cfg = wiring::load_config(&cli.config)?;

    let missing = cfg.missing_credentials();
    if !missing.is_empty() {
        tracing::warn!(?missing, "credentials not set; affected calls will fail");
    }

    let agent = wiring::build_agent(&cfg)?;
    let app = web::router(Arc::new(agent));

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    web::serve(&addr, app, shutdown_signal()).await?;

    tracing::info!("server.stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("ctrl-c handler failed: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
