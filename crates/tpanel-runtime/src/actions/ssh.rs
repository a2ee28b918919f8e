//! SSH key, daemon and connectivity actions.

use std::io;

use tpanel_core::{CommandLine, LogLevel, PanelEvent};

use super::dispatcher::{ActionError, RequestContext};

/// Outcome level of `ssh -T` against a git host.
///
/// Exit 1 counts as success because hosts like GitHub close an
/// authenticated shell-less session with status 1. This also accepts any
/// other failure that happens to exit 1.
pub const fn classify_ssh_probe_exit(exit_code: i32) -> LogLevel {
    match exit_code {
        0 | 1 => LogLevel::Success,
        _ => LogLevel::Error,
    }
}

pub(super) async fn show_ssh_key(ctx: &RequestContext<'_>) -> Result<(), ActionError> {
    let path = &ctx.settings.ssh_public_key;
    match tokio::fs::read_to_string(path).await {
        Ok(key) => {
            ctx.send(PanelEvent::SshKey {
                key: key.trim().to_string(),
            });
            ctx.log(LogLevel::Success, "SSH public key loaded");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            ctx.log(
                LogLevel::Error,
                "SSH key not found. Generate one with: ssh-keygen -t ed25519",
            );
            Ok(())
        }
        Err(source) => Err(ActionError::Io {
            path: path.clone(),
            source,
        }),
    }
}

pub(super) async fn enable_ssh(ctx: &RequestContext<'_>) {
    let in_termux = tokio::fs::try_exists(&ctx.settings.termux_marker)
        .await
        .unwrap_or(false);
    if !in_termux {
        ctx.log(
            LogLevel::Warning,
            "SSH server management only available in Termux",
        );
        return;
    }

    let output = ctx
        .runner
        .run(&CommandLine::new("sv-enable").arg("sshd"))
        .await;
    if output.success() {
        ctx.log(LogLevel::Success, "SSH server enabled successfully");
    } else {
        ctx.log(
            LogLevel::Error,
            format!("Failed to enable SSH: {}", output.diagnostics()),
        );
    }
}

pub(super) async fn test_github_ssh(ctx: &RequestContext<'_>) {
    let command = CommandLine::new("ssh")
        .args(["-o", "StrictHostKeyChecking=no", "-T"])
        .arg(&ctx.settings.ssh_test_target);
    let exit_code = ctx.streamer.stream(&command, &ctx.sink(), "[ssh] ").await;
    ctx.log(
        classify_ssh_probe_exit(exit_code),
        format!("SSH test finished (exit {exit_code})"),
    );
}
