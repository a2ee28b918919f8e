//! Probe port.
//!
//! A probe reads one facet of system state and returns a [`Snapshot`]. Probes
//! only query; they never change the system.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ProbeKind, Snapshot};

/// Errors that prevent a probe from producing any snapshot this cycle.
///
/// Partial failures (one tool check, one project) are folded into the
/// snapshot itself and never surface here.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A directory the probe must enumerate could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The probe task panicked or was aborted.
    #[error("Probe task failed: {0}")]
    Task(String),
}

/// One independent probe.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Which probe this is; also decides the event name.
    fn kind(&self) -> ProbeKind;

    /// Compute a fresh snapshot.
    async fn probe(&self) -> Result<Snapshot, ProbeError>;
}
