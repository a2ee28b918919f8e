//! Git remote URL classification for the HTTPS → SSH rewrite.

use thiserror::Error;
use url::Url;

/// Outcome of classifying an existing remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRewrite {
    /// Already an SSH remote; nothing to write.
    AlreadySsh,
    /// SSH form of an HTTPS remote.
    Rewritten(String),
}

/// The URL matched none of the known remote shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized remote URL: {0}")]
pub struct UnrecognizedRemote(pub String);

/// Classify `url` and derive its SSH form.
///
/// - `git@host:path` and `ssh://…` are already SSH.
/// - `https://host/owner/repo[/…][.git]` becomes `git@host:owner/repo[/…][.git]`.
///   Embedded credentials are dropped. Explicit ports, queries and fragments
///   have no scp-style equivalent and are refused, as are paths with fewer
///   than two segments.
pub fn classify_remote(url: &str) -> Result<RemoteRewrite, UnrecognizedRemote> {
    let url = url.trim();
    let unrecognized = || UnrecognizedRemote(url.to_string());

    if url.starts_with("git@") || url.starts_with("ssh://") {
        return Ok(RemoteRewrite::AlreadySsh);
    }
    if !url.starts_with("https://") {
        return Err(unrecognized());
    }

    let parsed = Url::parse(url).map_err(|_| unrecognized())?;
    if parsed.port().is_some() || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(unrecognized());
    }
    let host = parsed.host_str().ok_or_else(unrecognized)?;

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    if segments.len() < 2 {
        return Err(unrecognized());
    }

    Ok(RemoteRewrite::Rewritten(format!(
        "git@{host}:{}",
        segments.join("/")
    )))
}
