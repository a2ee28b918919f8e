//! Probe results.
//!
//! Snapshots compare structurally. `DiskUsage` is backed by a `BTreeMap`, so
//! two usage maps with the same entries are equal regardless of the order in
//! which a probe inserted them.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::events::PanelEvent;

/// Presence flags for the tracked external tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub node: bool,
    pub git: bool,
    pub zsh: bool,
    pub neovim: bool,
    /// Installed and authenticated.
    pub gemini: bool,
    /// SSH daemon running.
    pub ssh: bool,
}

/// Directory name to human-readable size (as printed by `du -sh`).
pub type DiskUsage = BTreeMap<String, String>;

/// One version-controlled project under the projects root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Directory name.
    pub name: String,
    /// Absolute path; unique within one probe cycle.
    pub path: PathBuf,
    /// Current branch, or `unknown` when it could not be read.
    pub branch: String,
    /// Working tree has uncommitted changes.
    #[serde(rename = "hasChanges")]
    pub dirty: bool,
    /// `<short hash> <subject>` of HEAD.
    pub last_commit: Option<String>,
}

/// Identifies a probe and the event its snapshots are broadcast as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProbeKind {
    SystemStatus,
    DiskUsage,
    Projects,
}

impl ProbeKind {
    /// Every probe, in resync order.
    pub const ALL: [Self; 3] = [Self::SystemStatus, Self::DiskUsage, Self::Projects];

    /// Name of the event carrying this probe's snapshot.
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::SystemStatus => "system_status",
            Self::DiskUsage => "disk_usage",
            Self::Projects => "git_projects",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// The latest value produced by one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    SystemStatus(SystemStatus),
    DiskUsage(DiskUsage),
    Projects(Vec<ProjectSummary>),
}

impl Snapshot {
    /// The probe this snapshot belongs to.
    pub const fn kind(&self) -> ProbeKind {
        match self {
            Self::SystemStatus(_) => ProbeKind::SystemStatus,
            Self::DiskUsage(_) => ProbeKind::DiskUsage,
            Self::Projects(_) => ProbeKind::Projects,
        }
    }

    /// Convert into the event observers receive.
    pub fn into_event(self) -> PanelEvent {
        match self {
            Self::SystemStatus(status) => PanelEvent::SystemStatus(status),
            Self::DiskUsage(usage) => PanelEvent::DiskUsage(usage),
            Self::Projects(projects) => PanelEvent::GitProjects(projects),
        }
    }
}

/// Body of the "current full status" read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub system: SystemStatus,
    pub disk: DiskUsage,
    pub projects: Vec<ProjectSummary>,
}

impl StatusReport {
    /// Assemble a report from whatever snapshots exist; missing ones stay default.
    pub fn from_snapshots<I>(snapshots: I) -> Self
    where
        I: IntoIterator<Item = Snapshot>,
    {
        snapshots
            .into_iter()
            .fold(Self::default(), |mut report, snapshot| {
                match snapshot {
                    Snapshot::SystemStatus(status) => report.system = status,
                    Snapshot::DiskUsage(usage) => report.disk = usage,
                    Snapshot::Projects(projects) => report.projects = projects,
                }
                report
            })
    }
}
