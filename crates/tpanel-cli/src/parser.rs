//! Root CLI structure.
//!
//! Every option can also be given through a `TPANEL_*` environment variable.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use tpanel_axum::ServerConfig;
use tpanel_axum::bootstrap::{DEFAULT_HOST, DEFAULT_PORT};
use tpanel_core::{DEFAULT_POLL_INTERVAL, PanelSettings, SettingsError};

/// Live system panel and action relay for Termux setups.
#[derive(Debug, Parser)]
#[command(name = "tpanel")]
#[command(about = "Watch tools, disk usage and git projects; run setup actions from a web UI")]
#[command(version)]
pub struct Cli {
    /// Interface to bind
    #[arg(long, env = "TPANEL_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// HTTP port
    #[arg(short, long, env = "TPANEL_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds between probe cycles
    #[arg(
        long = "interval",
        env = "TPANEL_INTERVAL_SECS",
        default_value_t = DEFAULT_POLL_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_secs: u64,

    /// Directory containing `<module>.sh` setup scripts
    #[arg(long, env = "TPANEL_MODULES_DIR")]
    pub modules_dir: Option<PathBuf>,

    /// Directory scanned for git projects (default: ~/src)
    #[arg(long, env = "TPANEL_PROJECTS_ROOT")]
    pub projects_root: Option<PathBuf>,

    /// Built web UI to serve at `/`
    #[arg(long, env = "TPANEL_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Apply overrides to home-directory defaults.
    pub fn apply(&self, mut settings: PanelSettings) -> PanelSettings {
        settings = settings.with_poll_interval(Duration::from_secs(self.interval_secs));
        if let Some(dir) = &self.modules_dir {
            settings = settings.with_modules_dir(dir);
        }
        if let Some(dir) = &self.projects_root {
            settings = settings.with_projects_root(dir);
        }
        settings
    }

    /// Server configuration rooted at the current user's home directory.
    pub fn server_config(&self) -> Result<ServerConfig, SettingsError> {
        let settings = self.apply(PanelSettings::from_home_dir()?);
        Ok(self.server_config_with(settings))
    }

    /// Server configuration for already-built settings.
    pub fn server_config_with(&self, settings: PanelSettings) -> ServerConfig {
        let mut config = ServerConfig::new(settings);
        config.host.clone_from(&self.host);
        config.port = self.port;
        if let Some(dir) = &self.static_dir {
            config = config.with_static_dir(dir);
        }
        config
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub const fn default_log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
