//! AI-Agno - placeholder host process for the Agnos agent service
//!
//! The service announces that it is starting and ready, then logs a
//! heartbeat on a fixed cadence until the process is stopped.

pub mod config;
pub mod error;
pub mod heartbeat;
pub mod logging;

pub use config::Config;
pub use error::{AgnoError, Result};
pub use heartbeat::{HeartbeatService, TracingSink};
