//! Configuration for the AI-Agno service
//!
//! Values are layered: built-in defaults, then `~/.ai-agno/config.json`
//! (optional), then `AI_AGNO_*` environment variables, then CLI flags
//! via [`Config::apply_cli`].

mod interval;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AgnoError, Result};

pub use interval::parse_interval;

/// Default heartbeat cadence in seconds.
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 60;

/// Upper bound on the heartbeat interval (one year).
pub const MAX_HEARTBEAT_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// Env var overriding the heartbeat interval ("60s", "5m", ...).
pub const ENV_HEARTBEAT_INTERVAL: &str = "AI_AGNO_HEARTBEAT_INTERVAL";
/// Env var overriding the fallback log filter.
pub const ENV_LOG: &str = "AI_AGNO_LOG";
/// Env var selecting `text` or `json` log output.
pub const ENV_LOG_FORMAT: &str = "AI_AGNO_LOG_FORMAT";

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = AgnoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AgnoError::Config(format!(
                "Unknown log format '{}'. Expected 'text' or 'json'",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between "running" heartbeat lines.
    pub heartbeat_interval_secs: u64,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Output format for log lines.
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            log_filter: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Base directory for AI-Agno state (`~/.ai-agno`).
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ai-agno")
    }

    /// Default config file location.
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from the default location, falling back to defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load from a JSON file. A missing file yields `Config::default()`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| {
            AgnoError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Apply `AI_AGNO_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Empty values are ignored so `AI_AGNO_LOG=` does not wipe the filter.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get(ENV_HEARTBEAT_INTERVAL) {
            self.heartbeat_interval_secs = parse_interval(&raw)?;
        }
        if let Some(filter) = get(ENV_LOG) {
            self.log_filter = filter;
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            self.log_format = format.parse()?;
        }
        Ok(())
    }

    /// Apply command-line flags, the highest-precedence layer.
    pub fn apply_cli(
        &mut self,
        interval: Option<&str>,
        log_format: Option<LogFormat>,
    ) -> Result<()> {
        if let Some(raw) = interval {
            self.heartbeat_interval_secs = parse_interval(raw)
                .map_err(|e| AgnoError::Config(format!("Invalid --interval '{}': {}", raw, e)))?;
        }
        if let Some(format) = log_format {
            self.log_format = format;
        }
        Ok(())
    }

    /// Reject values the heartbeat loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.heartbeat_interval_secs == 0 {
            return Err(AgnoError::Config(
                "heartbeat_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.heartbeat_interval_secs > MAX_HEARTBEAT_INTERVAL_SECS {
            return Err(AgnoError::Config(format!(
                "heartbeat_interval_secs must be at most {} (one year), got {}",
                MAX_HEARTBEAT_INTERVAL_SECS, self.heartbeat_interval_secs
            )));
        }
        Ok(())
    }

    /// Heartbeat interval as a `Duration`.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}
