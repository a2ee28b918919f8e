//! External command descriptions and their results.

use std::ffi::OsString;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Exit code reported when a command could not be launched at all, or was
/// terminated by a signal and therefore has no exit status.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = -1;

/// A program invocation.
///
/// Arguments are passed to the program verbatim; no shell is involved, so
/// paths and user-supplied values are never re-parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program name (looked up on `PATH`) or absolute path.
    pub program: OsString,
    /// Arguments in order.
    pub args: Vec<OsString>,
    /// Extra environment variables layered over the inherited environment.
    pub env: Vec<(OsString, OsString)>,
}

impl CommandLine {
    /// Create a command with no arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key.to_string_lossy(), value.to_string_lossy())?;
        }
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Buffered result of running a command to completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Captured stdout, lossily decoded and trimmed.
    pub stdout: String,
    /// Captured stderr, lossily decoded and trimmed. Holds the launch error
    /// message when the program could not be started.
    pub stderr: String,
    /// Process exit code, or [`LAUNCH_FAILURE_EXIT_CODE`].
    pub exit_code: i32,
}

impl CommandOutput {
    /// Result for a command that never started.
    pub fn launch_failure(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: message.into(),
            exit_code: LAUNCH_FAILURE_EXIT_CODE,
        }
    }

    /// Whether the command exited with status 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stderr if non-empty, otherwise stdout.
    pub fn diagnostics(&self) -> &str {
        if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Severity attached to `log` and `task_log` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_display() {
        let cmd = CommandLine::new("git")
            .args(["-C", "/tmp/repo"])
            .arg("status")
            .env("LANG", "C");
        assert_eq!(cmd.to_string(), "LANG=C git -C /tmp/repo status");
    }

    #[test]
    fn test_launch_failure_is_not_success() {
        let output = CommandOutput::launch_failure("No such file or directory");
        assert!(!output.success());
        assert_eq!(output.exit_code, LAUNCH_FAILURE_EXIT_CODE);
        assert!(output.stdout.is_empty());
        assert_eq!(output.diagnostics(), "No such file or directory");
    }

    #[test]
    fn test_diagnostics_falls_back_to_stdout() {
        let output = CommandOutput {
            stdout: "not logged in".to_string(),
            stderr: String::new(),
            exit_code: 1,
        };
        assert_eq!(output.diagnostics(), "not logged in");
    }

    #[test]
    fn test_log_level_wire_names() {
        assert_eq!(
            serde_json::to_string(&LogLevel::Warning).unwrap(),
            "\"warning\""
        );
        assert_eq!(
            serde_json::to_string(&LogLevel::Success).unwrap(),
            "\"success\""
        );
    }
}
