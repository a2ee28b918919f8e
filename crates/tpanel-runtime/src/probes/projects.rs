//! Git project discovery probe.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::warn;

use tpanel_core::{
    CommandLine, Probe, ProbeError, ProbeKind, ProcessRunner, ProjectSummary, Snapshot,
};

const UNKNOWN_BRANCH: &str = "unknown";

/// Lists git repositories directly under the projects root.
pub struct ProjectsProbe {
    runner: Arc<dyn ProcessRunner>,
    root: PathBuf,
}

impl ProjectsProbe {
    pub fn new(runner: Arc<dyn ProcessRunner>, root: PathBuf) -> Self {
        Self { runner, root }
    }

    fn read_dir_error(&self, source: io::Error) -> ProbeError {
        ProbeError::ReadDir {
            path: self.root.clone(),
            source,
        }
    }

    /// Child directories containing `.git`, sorted by name.
    async fn discover(&self) -> Result<Vec<(String, PathBuf)>, ProbeError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.read_dir_error(e)),
        };

        let mut repos = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| self.read_dir_error(e))?
        {
            let path = entry.path();
            let is_dir = tokio::fs::metadata(&path)
                .await
                .is_ok_and(|meta| meta.is_dir());
            if is_dir && tokio::fs::try_exists(path.join(".git")).await.unwrap_or(false) {
                repos.push((entry.file_name().to_string_lossy().into_owned(), path));
            }
        }

        repos.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(repos)
    }

    async fn git(&self, repo: &Path, args: &[&str]) -> Option<String> {
        let output = self
            .runner
            .run(&CommandLine::new("git").arg("-C").arg(repo).args(args.iter().copied()))
            .await;
        if !output.success() {
            warn!(
                repo = %repo.display(),
                args = ?args,
                error = %output.diagnostics(),
                "git query failed"
            );
            return None;
        }
        Some(output.stdout)
    }

    async fn summarize(&self, name: String, path: PathBuf) -> ProjectSummary {
        let (branch, status, last_commit) = tokio::join!(
            self.git(&path, &["branch", "--show-current"]),
            self.git(&path, &["status", "--porcelain"]),
            self.git(&path, &["log", "-1", "--format=%h %s"]),
        );

        ProjectSummary {
            name,
            branch: branch
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| UNKNOWN_BRANCH.to_string()),
            dirty: status.is_some_and(|s| !s.is_empty()),
            last_commit: last_commit.filter(|c| !c.is_empty()),
            path,
        }
    }
}

#[async_trait]
impl Probe for ProjectsProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Projects
    }

    async fn probe(&self) -> Result<Snapshot, ProbeError> {
        let repos = self.discover().await?;
        let projects = join_all(
            repos
                .into_iter()
                .map(|(name, path)| self.summarize(name, path)),
        )
        .await;
        Ok(Snapshot::Projects(projects))
    }
}
