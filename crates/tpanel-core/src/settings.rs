//! Static configuration.
//!
//! Everything here is fixed for the lifetime of the process: the set of
//! probed directories, the module allow-list and the poll cadence. The CLI
//! builds it once from the home directory plus overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default interval between probe cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default cap on unread `task_log` lines queued per observer.
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Setup modules that may be run from the panel.
pub const DEFAULT_ALLOWED_MODULES: [&str; 8] = [
    "00-user-setup",
    "00-base-packages",
    "01-zsh-setup",
    "02-neovim-setup",
    "03-ai-integration",
    "05-ssh-setup",
    "06-fonts-setup",
    "07-local-ssh-server",
];

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Cannot determine home directory")]
    NoHomeDir,

    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("Event buffer must hold at least one event")]
    ZeroEventBuffer,

    #[error("Module allow-list contains an invalid name: {0:?}")]
    InvalidModuleName(String),
}

/// Relay configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSettings {
    /// Home directory; sized as `Home Total`.
    pub home_dir: PathBuf,
    /// Directory scanned one level deep for git projects.
    pub projects_root: PathBuf,
    /// Named directories whose size is reported when they exist.
    pub tracked_dirs: Vec<(String, PathBuf)>,
    /// Cadence of each probe.
    pub poll_interval: Duration,
    /// Where `<module>.sh` scripts live.
    pub modules_dir: PathBuf,
    /// Module names accepted by `run_module`.
    pub allowed_modules: Vec<String>,
    /// Public key shown by `show_ssh_key`.
    pub ssh_public_key: PathBuf,
    /// Path whose existence means "running inside Termux".
    pub termux_marker: PathBuf,
    /// Destination of the SSH connectivity test.
    pub ssh_test_target: String,
    /// Unread `task_log` lines queued per observer before further lines are
    /// dropped. Other events are always delivered.
    pub event_buffer: usize,
}

impl PanelSettings {
    /// Defaults rooted at the current user's home directory.
    pub fn from_home_dir() -> Result<Self, SettingsError> {
        let home = dirs::home_dir().ok_or(SettingsError::NoHomeDir)?;
        Ok(Self::for_home(home))
    }

    /// Defaults rooted at `home`.
    pub fn for_home(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref();
        Self {
            home_dir: home.to_path_buf(),
            projects_root: home.join("src"),
            tracked_dirs: vec![
                (".npm".to_string(), home.join(".npm")),
                ("termux-ai".to_string(), home.join("termux-ai-setup")),
                ("src".to_string(), home.join("src")),
                (".config".to_string(), home.join(".config")),
            ],
            poll_interval: DEFAULT_POLL_INTERVAL,
            modules_dir: PathBuf::from("modules"),
            allowed_modules: DEFAULT_ALLOWED_MODULES
                .iter()
                .map(ToString::to_string)
                .collect(),
            ssh_public_key: home.join(".ssh").join("id_ed25519.pub"),
            termux_marker: PathBuf::from("/data/data/com.termux"),
            ssh_test_target: "git@github.com".to_string(),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }

    #[must_use]
    pub fn with_modules_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.modules_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_projects_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.projects_root = dir.into();
        self
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.poll_interval.is_zero() {
            return Err(SettingsError::ZeroPollInterval);
        }
        if self.event_buffer == 0 {
            return Err(SettingsError::ZeroEventBuffer);
        }
        if let Some(bad) = self
            .allowed_modules
            .iter()
            .find(|name| !is_plain_module_name(name))
        {
            return Err(SettingsError::InvalidModuleName(bad.clone()));
        }
        Ok(())
    }

    pub fn is_module_allowed(&self, name: &str) -> bool {
        self.allowed_modules.iter().any(|allowed| allowed == name)
    }

    /// Script path for a module name. Does not check the allow-list.
    pub fn module_script(&self, name: &str) -> PathBuf {
        self.modules_dir.join(format!("{name}.sh"))
    }
}

/// Module names become file names; keep them to one path component.
fn is_plain_module_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
