//! Heartbeat events and the sinks they are written to.

use std::fmt;
use std::sync::Mutex;

use tracing::info;

/// Message logged once when the service starts.
pub const STARTING_MESSAGE: &str = "AI-Agno service starting...";
/// Message logged once, right after the start message.
pub const READY_MESSAGE: &str = "Agnos agent framework is ready for implementation";
/// Message logged on every heartbeat.
pub const RUNNING_MESSAGE: &str = "AI-Agno service is running...";
/// Message logged when the loop is cancelled by a shutdown signal.
pub const STOPPED_MESSAGE: &str = "AI-Agno service stopped";

/// A lifecycle event emitted by the heartbeat runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatEvent {
    Starting,
    Ready,
    /// Periodic liveness line. `beat` counts from 1.
    Running { beat: u64 },
    /// Emitted by `run_until` after the shutdown future resolves.
    Stopped { beats: u64 },
}

impl HeartbeatEvent {
    /// Human-readable message for this event.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Starting => STARTING_MESSAGE,
            Self::Ready => READY_MESSAGE,
            Self::Running { .. } => RUNNING_MESSAGE,
            Self::Stopped { .. } => STOPPED_MESSAGE,
        }
    }
}

impl fmt::Display for HeartbeatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Destination for heartbeat events.
///
/// The runner only ever talks to this trait, so the logging backend is
/// chosen by whoever constructs the service.
#[cfg_attr(test, mockall::automock)]
pub trait HeartbeatSink: Send + Sync {
    fn emit(&self, event: &HeartbeatEvent);
}

/// Sink that writes every event as an INFO record through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl HeartbeatSink for TracingSink {
    fn emit(&self, event: &HeartbeatEvent) {
        match event {
            HeartbeatEvent::Running { beat } => {
                info!(target: "ai_agno::heartbeat", beat = *beat, "{}", event)
            }
            HeartbeatEvent::Stopped { beats } => {
                info!(target: "ai_agno::heartbeat", beats = *beats, "{}", event)
            }
            _ => info!(target: "ai_agno::heartbeat", "{}", event),
        }
    }
}

/// Sink that keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<HeartbeatEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<HeartbeatEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Rendered messages, in order.
    pub fn messages(&self) -> Vec<&'static str> {
        self.events().iter().map(HeartbeatEvent::message).collect()
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HeartbeatSink for RecordingSink {
    fn emit(&self, event: &HeartbeatEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(*event),
            Err(poisoned) => poisoned.into_inner().push(*event),
        }
    }
}
