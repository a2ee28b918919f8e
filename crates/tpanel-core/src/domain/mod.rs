//! Domain types.
//!
//! Pure values with no infrastructure dependencies. Everything here is
//! constructed fresh by probes or parsed from the wire and never mutated
//! after construction.

mod action;
mod command;
mod remote;
mod snapshot;

pub use action::{Action, ActionKind, ActionRejection, ActionRequest};
pub use command::{CommandLine, CommandOutput, LAUNCH_FAILURE_EXIT_CODE, LogLevel};
pub use remote::{RemoteRewrite, UnrecognizedRemote, classify_remote};
pub use snapshot::{DiskUsage, ProbeKind, ProjectSummary, Snapshot, StatusReport, SystemStatus};
