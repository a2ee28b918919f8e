//! Axum server bootstrap - the composition root.
//!
//! The only place where concrete runtime pieces are wired together.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};

use tpanel_core::{PanelSettings, ProcessRunner, SnapshotStore, StreamingRunner};
use tpanel_runtime::{
    ActionDispatcher, ObserverHub, PollLoop, ProbeSet, TokioProcessRunner, default_probes,
};

use crate::routes::{create_router, create_spa_router};
use crate::state::AppState;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Optional path to a built web UI, served with SPA fallback.
    pub static_dir: Option<PathBuf>,
    /// Probe, module and action settings.
    pub settings: PanelSettings,
}

impl ServerConfig {
    /// Default listener settings for the given panel settings.
    pub fn new(settings: PanelSettings) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: None,
            settings,
        }
    }

    /// Set the static directory for SPA serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    pub settings: Arc<PanelSettings>,
    /// Last broadcast snapshot per probe; read for resync and `/api/status`.
    pub store: Arc<SnapshotStore>,
    /// Connected observers.
    pub hub: Arc<ObserverHub>,
    pub poll_loop: PollLoop,
    pub dispatcher: ActionDispatcher,
}

impl AxumContext {
    /// Wire a context from its ports. Does not start the poll loop.
    pub fn new(
        settings: PanelSettings,
        runner: Arc<dyn ProcessRunner>,
        streamer: Arc<dyn StreamingRunner>,
        probes: ProbeSet,
    ) -> Self {
        let settings = Arc::new(settings);
        let store = Arc::new(SnapshotStore::new());
        let hub = Arc::new(ObserverHub::new(settings.event_buffer));

        let poll_loop = PollLoop::new(
            probes,
            Arc::clone(&store),
            hub.clone(),
            settings.poll_interval,
        );
        let dispatcher =
            ActionDispatcher::new(Arc::clone(&settings), runner, streamer, hub.clone());

        Self {
            settings,
            store,
            hub,
            poll_loop,
            dispatcher,
        }
    }
}

/// Build the context with real processes and start polling.
pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    config.settings.validate()?;

    info!(
        home = %config.settings.home_dir.display(),
        projects_root = %config.settings.projects_root.display(),
        modules_dir = %config.settings.modules_dir.display(),
        interval = ?config.settings.poll_interval,
        "Axum bootstrap resolved settings"
    );

    let runner = Arc::new(TokioProcessRunner::new());
    let process_runner: Arc<dyn ProcessRunner> = runner.clone();
    let probes = default_probes(&config.settings, &process_runner);

    let ctx = AxumContext::new(config.settings.clone(), process_runner, runner, probes);
    ctx.poll_loop.start().await?;
    Ok(ctx)
}

/// Start the web server and run until ctrl-c.
///
/// If `config.static_dir` is set and exists, serves it with SPA fallback.
/// Otherwise, serves only the API and WebSocket endpoints.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let state: AppState = Arc::new(bootstrap(&config).await?);

    let app = match config.static_dir.as_deref() {
        Some(dir) if dir.is_dir() => {
            info!("Serving static assets from: {}", dir.display());
            create_spa_router(Arc::clone(&state), dir)
        }
        Some(dir) => {
            warn!("Static directory {} not found, serving API only", dir.display());
            create_router(Arc::clone(&state))
        }
        None => create_router(Arc::clone(&state)),
    };

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("tpanel listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.poll_loop.stop().await?;
    info!("tpanel stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
