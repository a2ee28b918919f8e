//! Process runner trait definitions.
//!
//! Two ways of running an external command: buffered to completion
//! ([`ProcessRunner`]) and line-by-line into a sink ([`StreamingRunner`]).
//! Neither imposes a timeout; callers decide which commands are safe to wait on.

use async_trait::async_trait;

use crate::domain::{CommandLine, CommandOutput, LogLevel};

/// Runs a command to completion and buffers its output.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command` and capture stdout, stderr and the exit code.
    ///
    /// A command that cannot be launched yields empty stdout, the launch
    /// error as stderr and [`crate::LAUNCH_FAILURE_EXIT_CODE`].
    async fn run(&self, command: &CommandLine) -> CommandOutput;
}

/// Destination for streamed output lines.
///
/// Implementations must not block; they are called from the stream readers.
pub trait LineSink: Send + Sync {
    /// Accept one complete line (without trailing newline).
    fn line(&self, level: LogLevel, message: String);
}

/// Runs a command while forwarding each output line as it appears.
#[async_trait]
pub trait StreamingRunner: Send + Sync {
    /// Run `command`, sending stdout lines as `info` and stderr lines as
    /// `error`, each prefixed with `prefix`. Returns the exit code once both
    /// streams are drained and the process has exited.
    ///
    /// A launch failure emits one `error` line and returns
    /// [`crate::LAUNCH_FAILURE_EXIT_CODE`].
    async fn stream(&self, command: &CommandLine, sink: &dyn LineSink, prefix: &str) -> i32;
}
