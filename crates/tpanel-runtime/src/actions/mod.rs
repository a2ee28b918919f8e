//! Action dispatch and handlers.
//!
//! Requests are validated into a closed [`tpanel_core::Action`] before any
//! handler runs. Every outcome event goes only to the requesting observer.

mod dispatcher;
mod gemini;
mod modules;
mod remote;
mod ssh;

pub use dispatcher::{ActionDispatcher, ActionError, ObserverLineSink};
pub use ssh::classify_ssh_probe_exit;
