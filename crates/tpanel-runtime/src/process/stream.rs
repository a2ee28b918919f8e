//! Async line readers for child output (non-UTF8-safe).
//!
//! Setup scripts and CLI tools can emit non-UTF8 bytes. `BufReader::lines()`
//! stops on invalid UTF-8, so lines are read as bytes and decoded lossily.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;

use tpanel_core::{LineSink, LogLevel};

/// Forward every non-blank line of `stream` to `sink` until EOF.
///
/// Lines are trimmed and prefixed with `prefix`. Returns the number of lines
/// forwarded.
pub(crate) async fn forward_lines(
    stream: impl AsyncRead + Unpin,
    level: LogLevel,
    prefix: &str,
    sink: &dyn LineSink,
) -> usize {
    let mut reader = BufReader::new(stream);
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    let mut forwarded = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break, // EOF
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                sink.line(level, format!("{prefix}{line}"));
                forwarded += 1;
            }
            Err(e) => {
                debug!(?level, error = %e, "Output reader exiting due to read error");
                break;
            }
        }
    }

    forwarded
}
