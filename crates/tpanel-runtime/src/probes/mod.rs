//! System probes.
//!
//! Each probe is independent and answers one question about the machine.
//! Individual command failures are folded into the snapshot (a tool is
//! "absent", a directory is omitted) rather than failing the probe.

mod disk;
mod projects;
mod tools;

use std::sync::Arc;

use tpanel_core::{PanelSettings, Probe, ProcessRunner};

pub use disk::{DiskUsageProbe, HOME_TOTAL};
pub use projects::ProjectsProbe;
pub use tools::ToolProbe;

/// The probes driven by one poll loop.
pub type ProbeSet = Vec<Arc<dyn Probe>>;

/// Build the standard probe set from settings.
pub fn default_probes(settings: &PanelSettings, runner: &Arc<dyn ProcessRunner>) -> ProbeSet {
    let tools: Arc<dyn Probe> = Arc::new(ToolProbe::new(Arc::clone(runner)));
    let disk: Arc<dyn Probe> = Arc::new(DiskUsageProbe::new(
        Arc::clone(runner),
        settings.home_dir.clone(),
        settings.tracked_dirs.clone(),
    ));
    let projects: Arc<dyn Probe> = Arc::new(ProjectsProbe::new(
        Arc::clone(runner),
        settings.projects_root.clone(),
    ));
    vec![tools, disk, projects]
}
