//! Tool presence probe.

use std::sync::Arc;

use async_trait::async_trait;

use tpanel_core::{
    CommandLine, Probe, ProbeError, ProbeKind, ProcessRunner, Snapshot, SystemStatus,
};

/// Reports which external tools are installed and usable.
pub struct ToolProbe {
    runner: Arc<dyn ProcessRunner>,
}

impl ToolProbe {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    async fn succeeds(&self, command: CommandLine) -> bool {
        self.runner.run(&command).await.success()
    }

    async fn has_version(&self, program: &str) -> bool {
        self.succeeds(CommandLine::new(program).arg("--version"))
            .await
    }

    /// Installed and authenticated; auth is not checked without the binary.
    async fn gemini_ready(&self) -> bool {
        self.has_version("gemini").await
            && self
                .succeeds(CommandLine::new("gemini").args(["auth", "test"]))
                .await
    }

    async fn sshd_running(&self) -> bool {
        self.succeeds(CommandLine::new("pgrep").arg("sshd")).await
    }
}

#[async_trait]
impl Probe for ToolProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::SystemStatus
    }

    async fn probe(&self) -> Result<Snapshot, ProbeError> {
        let (node, git, zsh, neovim, gemini, ssh) = tokio::join!(
            self.has_version("node"),
            self.has_version("git"),
            self.has_version("zsh"),
            self.has_version("nvim"),
            self.gemini_ready(),
            self.sshd_running(),
        );

        Ok(Snapshot::SystemStatus(SystemStatus {
            node,
            git,
            zsh,
            neovim,
            gemini,
            ssh,
        }))
    }
}
