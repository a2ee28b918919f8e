//! Tokio-backed command execution.

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use tpanel_core::{
    CommandLine, CommandOutput, LAUNCH_FAILURE_EXIT_CODE, LineSink, LogLevel, ProcessRunner,
    StreamingRunner,
};

use super::stream::forward_lines;

/// Runs commands with `tokio::process`, never through a shell.
///
/// Children are killed when their future is dropped, so cancelling a probe
/// does not leak processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub const fn new() -> Self {
        Self
    }

    fn command(line: &CommandLine) -> Command {
        let mut cmd = Command::new(&line.program);
        cmd.args(&line.args)
            .envs(line.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

/// Exit code, or the sentinel when the child was killed by a signal.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(LAUNCH_FAILURE_EXIT_CODE)
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: &CommandLine) -> CommandOutput {
        match Self::command(command).output().await {
            Ok(output) => {
                let result = CommandOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    exit_code: exit_code(output.status),
                };
                debug!(%command, exit_code = result.exit_code, "Command finished");
                result
            }
            Err(e) => {
                debug!(%command, error = %e, "Command failed to launch");
                CommandOutput::launch_failure(e.to_string())
            }
        }
    }
}

#[async_trait]
impl StreamingRunner for TokioProcessRunner {
    async fn stream(&self, command: &CommandLine, sink: &dyn LineSink, prefix: &str) -> i32 {
        let mut child = match Self::command(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!(%command, error = %e, "Streaming command failed to launch");
                sink.line(
                    LogLevel::Error,
                    format!(
                        "{prefix}Failed to start {}: {e}",
                        command.program.to_string_lossy()
                    ),
                );
                return LAUNCH_FAILURE_EXIT_CODE;
            }
        };

        debug!(%command, pid = ?child.id(), "Streaming command started");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let drain_stdout = async {
            match stdout {
                Some(out) => forward_lines(out, LogLevel::Info, prefix, sink).await,
                None => 0,
            }
        };
        let drain_stderr = async {
            match stderr {
                Some(err) => forward_lines(err, LogLevel::Error, prefix, sink).await,
                None => 0,
            }
        };
        let (out_lines, err_lines) = tokio::join!(drain_stdout, drain_stderr);

        let code = match child.wait().await {
            Ok(status) => exit_code(status),
            Err(e) => {
                warn!(%command, error = %e, "Failed to wait for streaming command");
                LAUNCH_FAILURE_EXIT_CODE
            }
        };
        debug!(%command, out_lines, err_lines, exit_code = code, "Streaming command finished");
        code
    }
}
