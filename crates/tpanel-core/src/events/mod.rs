//! Canonical event union for everything pushed to observers.
//!
//! # Wire Format
//!
//! Events are serialized with the event name and payload side by side:
//!
//! ```json
//! { "event": "task_complete", "data": { "task": "module:01-zsh-setup", "exitCode": 0 } }
//! ```

mod observer;

use serde::{Deserialize, Serialize};

use crate::domain::{DiskUsage, LogLevel, ProjectSummary, SystemStatus};

pub use observer::ObserverId;

/// Who an event is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// Every currently registered observer.
    All,
    /// A single observer; dropped silently if it is gone.
    Observer(ObserverId),
}

/// Events emitted by the poll loop and action handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PanelEvent {
    // ========== Probe snapshots ==========
    /// Tool presence flags.
    SystemStatus(SystemStatus),

    /// Directory sizes.
    DiskUsage(DiskUsage),

    /// Projects under the projects root, ordered by name.
    GitProjects(Vec<ProjectSummary>),

    // ========== Action feedback ==========
    /// One-shot message, typically an action's outcome.
    Log { level: LogLevel, message: String },

    /// A line of streamed output from a long-running command.
    TaskLog { level: LogLevel, message: String },

    /// A long-running task began.
    TaskStart { task: String },

    /// A long-running task finished.
    TaskComplete {
        task: String,
        #[serde(rename = "exitCode")]
        exit_code: i32,
    },

    /// The user's SSH public key.
    SshKey { key: String },

    /// Gemini CLI authentication state.
    GeminiAuth { authenticated: bool, details: String },
}

impl PanelEvent {
    /// Get the event name for wire protocols.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::SystemStatus(_) => "system_status",
            Self::DiskUsage(_) => "disk_usage",
            Self::GitProjects(_) => "git_projects",
            Self::Log { .. } => "log",
            Self::TaskLog { .. } => "task_log",
            Self::TaskStart { .. } => "task_start",
            Self::TaskComplete { .. } => "task_complete",
            Self::SshKey { .. } => "ssh_key",
            Self::GeminiAuth { .. } => "gemini_auth",
        }
    }

    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
        }
    }

    pub fn task_log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::TaskLog {
            level,
            message: message.into(),
        }
    }
}
