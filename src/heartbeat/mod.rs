//! Heartbeat service - periodic liveness announcements for the host process.

mod service;
mod sink;

pub use service::HeartbeatService;
pub use sink::{
    HeartbeatEvent, HeartbeatSink, RecordingSink, TracingSink, READY_MESSAGE, RUNNING_MESSAGE,
    STARTING_MESSAGE, STOPPED_MESSAGE,
};
