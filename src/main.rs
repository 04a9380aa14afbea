use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use ai_agno::config::LogFormat;
use ai_agno::{logging, Config, HeartbeatService, TracingSink};

#[derive(Parser)]
#[command(name = "ai-agno", version)]
#[command(about = "Placeholder host process for the Agnos agent service", long_about = None)]
struct Cli {
    /// Heartbeat interval (e.g. 60s, 5m, 1h)
    #[arg(long, value_name = "DUR")]
    interval: Option<String>,

    /// Path to a JSON config file (default: ~/.ai-agno/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log output format: text or json
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::load().context("Failed to load config")?,
        };

        config
            .apply_env_overrides()
            .context("Invalid AI_AGNO_* environment override")?;

        config.apply_cli(self.interval.as_deref(), self.log_format)?;
        config.validate()?;
        Ok(config)
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init(&config).context("Failed to initialize logging")?;

    let service = HeartbeatService::new(config.heartbeat_interval(), Arc::new(TracingSink));
    service.run_until(shutdown_signal()).await;

    Ok(())
}
