//! Logging setup.
//!
//! Installs the process-wide `tracing` subscriber from a [`Config`]. This is
//! called exactly once, by the binary. Library code never touches the global
//! subscriber and instead writes through a [`crate::heartbeat::HeartbeatSink`].

use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};
use crate::error::{AgnoError, Result};

/// Build the filter: `RUST_LOG` wins when set and valid, else the config.
pub fn env_filter(config: &Config) -> Result<EnvFilter> {
    filter_from(std::env::var("RUST_LOG").ok().as_deref(), &config.log_filter)
}

/// Build a filter from explicit directives.
///
/// An unparsable `rust_log` falls back to `fallback`; an unparsable
/// `fallback` is a configuration error.
pub fn filter_from(rust_log: Option<&str>, fallback: &str) -> Result<EnvFilter> {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return Ok(filter);
        }
    }

    EnvFilter::try_new(fallback)
        .map_err(|e| AgnoError::Config(format!("Invalid log filter '{}': {}", fallback, e)))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &Config) -> Result<()> {
    let filter = env_filter(config)?;

    let installed = match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    installed.map_err(|e| AgnoError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_used_without_rust_log() {
        let filter = filter_from(None, "info").unwrap();
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn test_rust_log_takes_precedence() {
        let filter = filter_from(Some("ai_agno=debug"), "info").unwrap();
        assert_eq!(filter.to_string(), "ai_agno=debug");
    }

    #[test]
    fn test_blank_rust_log_is_ignored() {
        let filter = filter_from(Some("   "), "warn").unwrap();
        assert_eq!(filter.to_string(), "warn");
    }
}
