//! Rewrite a repository's `origin` remote from HTTPS to SSH.

use std::path::Path;

use tpanel_core::{CommandLine, LogLevel, RemoteRewrite, classify_remote};

use super::dispatcher::RequestContext;

fn git_remote(repo: &Path) -> CommandLine {
    CommandLine::new("git").arg("-C").arg(repo).arg("remote")
}

/// Read, classify, then write. Nothing is written unless the current URL is
/// a recognized HTTPS remote.
pub(super) async fn set_repo_remote_ssh(ctx: &RequestContext<'_>, repo: &Path) {
    let current = ctx
        .runner
        .run(&git_remote(repo).args(["get-url", "origin"]))
        .await;
    if !current.success() {
        ctx.log(
            LogLevel::Error,
            format!("Could not read remote: {}", current.diagnostics()),
        );
        return;
    }
    if current.stdout.is_empty() {
        ctx.log(LogLevel::Error, "Could not read remote: origin URL is empty");
        return;
    }

    match classify_remote(&current.stdout) {
        Err(unrecognized) => ctx.log(LogLevel::Warning, unrecognized.to_string()),
        Ok(RemoteRewrite::AlreadySsh) => ctx.log(
            LogLevel::Success,
            format!("Remote origin already uses SSH: {}", current.stdout),
        ),
        Ok(RemoteRewrite::Rewritten(ssh_url)) => {
            let output = ctx
                .runner
                .run(&git_remote(repo).args(["set-url", "origin", ssh_url.as_str()]))
                .await;
            if output.success() {
                ctx.log(
                    LogLevel::Success,
                    format!("Remote origin updated to SSH: {ssh_url}"),
                );
            } else {
                ctx.log(
                    LogLevel::Error,
                    format!("Error updating remote: {}", output.diagnostics()),
                );
            }
        }
    }
}
