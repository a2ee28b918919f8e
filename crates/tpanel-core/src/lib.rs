//! Core domain types and port definitions for tpanel.
//!
//! tpanel watches local tool/system state, pushes deltas to connected
//! observers and runs a fixed catalog of shell operations on their behalf.
//! This crate holds everything that does not touch a process or a socket:
//!
//! - `domain` - snapshots, command lines, the action catalog, remote URL rules
//! - `events` - the outbound event union and delivery targets
//! - `ports` - traits implemented by the runtime and transport adapters
//! - `services` - the change detector shared by the poll loop and transports
//! - `settings` - static configuration
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    Action, ActionKind, ActionRejection, ActionRequest, CommandLine, CommandOutput, DiskUsage,
    LAUNCH_FAILURE_EXIT_CODE, LogLevel, ProbeKind, ProjectSummary, RemoteRewrite, Snapshot,
    StatusReport, SystemStatus, UnrecognizedRemote, classify_remote,
};
pub use events::{EventTarget, ObserverId, PanelEvent};
pub use ports::{
    EventBroadcaster, LineSink, NoopBroadcaster, Probe, ProbeError, ProcessRunner,
    StreamingRunner,
};
pub use services::SnapshotStore;
pub use settings::{
    DEFAULT_ALLOWED_MODULES, DEFAULT_EVENT_BUFFER, DEFAULT_POLL_INTERVAL, PanelSettings,
    SettingsError,
};

#[cfg(test)]
use tempfile as _;
