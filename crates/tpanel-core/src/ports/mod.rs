//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core expects from infrastructure. They
//! contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No tokio/axum types in any signature
//! - Fire-and-forget delivery: broadcasting never returns an error
//! - Command execution never fails as a `Result`; launch failures are folded
//!   into the returned exit code

pub mod event_broadcaster;
pub mod probe;
pub mod process_runner;

pub use event_broadcaster::{EventBroadcaster, NoopBroadcaster};
pub use probe::{Probe, ProbeError};
pub use process_runner::{LineSink, ProcessRunner, StreamingRunner};
