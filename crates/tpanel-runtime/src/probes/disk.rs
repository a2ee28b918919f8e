//! Disk usage probe.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::debug;

use tpanel_core::{CommandLine, DiskUsage, Probe, ProbeError, ProbeKind, ProcessRunner, Snapshot};

/// Key under which the home directory's size is reported.
pub const HOME_TOTAL: &str = "Home Total";

/// Reports `du -sh` sizes for the home directory and the tracked directories.
pub struct DiskUsageProbe {
    runner: Arc<dyn ProcessRunner>,
    home: PathBuf,
    tracked: Vec<(String, PathBuf)>,
}

impl DiskUsageProbe {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        home: PathBuf,
        tracked: Vec<(String, PathBuf)>,
    ) -> Self {
        Self {
            runner,
            home,
            tracked,
        }
    }

    /// Human-readable size, or `None` when `du` fails.
    async fn size_of(&self, path: &Path) -> Option<String> {
        let output = self
            .runner
            .run(&CommandLine::new("du").arg("-sh").arg(path))
            .await;
        if !output.success() {
            debug!(path = %path.display(), error = %output.diagnostics(), "du failed");
            return None;
        }
        output.stdout.split_whitespace().next().map(str::to_string)
    }
}

#[async_trait]
impl Probe for DiskUsageProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::DiskUsage
    }

    async fn probe(&self) -> Result<Snapshot, ProbeError> {
        let mut targets: Vec<(&str, &Path)> = vec![(HOME_TOTAL, self.home.as_path())];
        for (name, path) in &self.tracked {
            if tokio::fs::try_exists(path).await.unwrap_or(false) {
                targets.push((name.as_str(), path.as_path()));
            }
        }

        let sizes = join_all(targets.iter().map(|(_, path)| self.size_of(path))).await;

        let usage: DiskUsage = targets
            .iter()
            .zip(sizes)
            .filter_map(|((name, _), size)| size.map(|size| ((*name).to_string(), size)))
            .collect();

        Ok(Snapshot::DiskUsage(usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tpanel_core::CommandOutput;

    /// Answers `du` with a size derived from the directory name.
    struct FakeDu;

    #[async_trait]
    impl ProcessRunner for FakeDu {
        async fn run(&self, command: &CommandLine) -> CommandOutput {
            let path = PathBuf::from(&command.args[1]);
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if name.contains("broken") {
                return CommandOutput {
                    stdout: String::new(),
                    stderr: "du: cannot read".to_string(),
                    exit_code: 1,
                };
            }
            CommandOutput {
                stdout: format!("{}K\t{}", name.len(), path.display()),
                stderr: String::new(),
                exit_code: 0,
            }
        }
    }

    #[tokio::test]
    async fn test_reports_home_and_existing_tracked_dirs() {
        let home = TempDir::new().unwrap();
        std::fs::create_dir(home.path().join(".npm")).unwrap();
        std::fs::create_dir(home.path().join("broken")).unwrap();

        let probe = DiskUsageProbe::new(
            Arc::new(FakeDu),
            home.path().to_path_buf(),
            vec![
                (".npm".to_string(), home.path().join(".npm")),
                ("missing".to_string(), home.path().join("missing")),
                ("broken".to_string(), home.path().join("broken")),
            ],
        );

        let Snapshot::DiskUsage(usage) = probe.probe().await.unwrap() else {
            panic!("wrong snapshot kind");
        };
        assert!(usage.contains_key(HOME_TOTAL));
        assert_eq!(usage.get(".npm").map(String::as_str), Some("4K"));
        assert!(!usage.contains_key("missing"));
        assert!(!usage.contains_key("broken"));
    }
}
