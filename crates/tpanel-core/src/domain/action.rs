//! The action catalog.
//!
//! Requests arrive as loosely typed JSON (`type` + `params`). They are turned
//! into a closed [`Action`] enum before anything runs: first the type must be
//! a catalog member, then the type-specific parameters are checked. Checks
//! that touch the filesystem (script and repository existence) are left to
//! the async dispatcher.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::LogLevel;
use crate::settings::PanelSettings;

/// Raw action request as received from an observer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Catalog name, e.g. `run_module`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Free-form parameters.
    #[serde(default, deserialize_with = "params_or_empty")]
    pub params: Map<String, Value>,
}

/// `params: null` and non-object params are treated as "no params".
fn params_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

impl ActionRequest {
    /// Build a request from a type name and params.
    pub fn new(kind: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }

    fn str_param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Every action type the relay understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ShowSshKey,
    EnableSsh,
    StartHttpServer,
    GeminiAuthStatus,
    GeminiLogin,
    RunModule,
    TestGithubSsh,
    SetRepoRemoteSsh,
}

impl ActionKind {
    pub const ALL: [Self; 8] = [
        Self::ShowSshKey,
        Self::EnableSsh,
        Self::StartHttpServer,
        Self::GeminiAuthStatus,
        Self::GeminiLogin,
        Self::RunModule,
        Self::TestGithubSsh,
        Self::SetRepoRemoteSsh,
    ];

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShowSshKey => "show_ssh_key",
            Self::EnableSsh => "enable_ssh",
            Self::StartHttpServer => "start_http_server",
            Self::GeminiAuthStatus => "gemini_auth_status",
            Self::GeminiLogin => "gemini_login",
            Self::RunModule => "run_module",
            Self::TestGithubSsh => "test_github_ssh",
            Self::SetRepoRemoteSsh => "set_repo_remote_ssh",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ActionRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ActionRejection::UnknownAction(s.to_string()))
    }
}

/// Why a request was refused before any side effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionRejection {
    /// Type is not in the catalog.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Module name is not on the allow-list.
    #[error("Module not allowed: {0}")]
    ModuleNotAllowed(String),

    /// A required parameter is absent or empty.
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// A path parameter points nowhere.
    #[error("Invalid repository path: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Allowed module whose script is not on disk.
    #[error("Module not found: {}", .0.display())]
    ModuleScriptMissing(PathBuf),
}

impl ActionRejection {
    /// Level of the single event reported back to the requester.
    pub const fn level(&self) -> LogLevel {
        match self {
            Self::UnknownAction(_) | Self::ModuleNotAllowed(_) => LogLevel::Warning,
            Self::MissingParameter(_) | Self::PathNotFound(_) | Self::ModuleScriptMissing(_) => {
                LogLevel::Error
            }
        }
    }
}

/// A validated action, carrying its checked parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ShowSshKey,
    EnableSsh,
    StartHttpServer,
    GeminiAuthStatus,
    GeminiLogin,
    RunModule { name: String, script: PathBuf },
    TestGithubSsh,
    SetRepoRemoteSsh { repo: PathBuf },
}

impl Action {
    /// Validate a raw request against the catalog and settings.
    ///
    /// Type membership is checked before any parameter. Does not touch the
    /// filesystem.
    pub fn validate(
        request: &ActionRequest,
        settings: &PanelSettings,
    ) -> Result<Self, ActionRejection> {
        let kind: ActionKind = request.kind.parse()?;

        Ok(match kind {
            ActionKind::ShowSshKey => Self::ShowSshKey,
            ActionKind::EnableSsh => Self::EnableSsh,
            ActionKind::StartHttpServer => Self::StartHttpServer,
            ActionKind::GeminiAuthStatus => Self::GeminiAuthStatus,
            ActionKind::GeminiLogin => Self::GeminiLogin,
            ActionKind::TestGithubSsh => Self::TestGithubSsh,
            ActionKind::RunModule => {
                let name = request
                    .str_param("name")
                    .ok_or(ActionRejection::MissingParameter("name"))?;
                if !settings.is_module_allowed(name) {
                    return Err(ActionRejection::ModuleNotAllowed(name.to_string()));
                }
                Self::RunModule {
                    name: name.to_string(),
                    script: settings.module_script(name),
                }
            }
            ActionKind::SetRepoRemoteSsh => {
                let path = request
                    .str_param("path")
                    .ok_or(ActionRejection::MissingParameter("path"))?;
                Self::SetRepoRemoteSsh {
                    repo: PathBuf::from(path),
                }
            }
        })
    }

    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::ShowSshKey => ActionKind::ShowSshKey,
            Self::EnableSsh => ActionKind::EnableSsh,
            Self::StartHttpServer => ActionKind::StartHttpServer,
            Self::GeminiAuthStatus => ActionKind::GeminiAuthStatus,
            Self::GeminiLogin => ActionKind::GeminiLogin,
            Self::RunModule { .. } => ActionKind::RunModule,
            Self::TestGithubSsh => ActionKind::TestGithubSsh,
            Self::SetRepoRemoteSsh { .. } => ActionKind::SetRepoRemoteSsh,
        }
    }
}
