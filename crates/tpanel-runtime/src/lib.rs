//! Process runtime and OS-level concerns for tpanel.
//!
//! Implements the ports defined in `tpanel-core`: command execution on
//! tokio, the system probes, observer fan-out, the poll loop and the action
//! handlers. Transports only need [`ObserverHub`], [`PollLoop`] and
//! [`ActionDispatcher`].
#![deny(unsafe_code)]

pub mod actions;
pub mod broadcast;
pub mod poll_loop;
pub mod probes;
pub mod process;

pub use actions::{ActionDispatcher, ActionError, ObserverLineSink, classify_ssh_probe_exit};
pub use broadcast::{ObserverEvents, ObserverHub, TryRecvError};
pub use poll_loop::{PollLoop, PollLoopError, poll_once};
pub use probes::{DiskUsageProbe, ProbeSet, ProjectsProbe, ToolProbe, default_probes};
pub use process::TokioProcessRunner;
