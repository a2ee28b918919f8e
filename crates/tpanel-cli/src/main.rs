//! CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tpanel_cli::Cli;

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.default_log_filter());

    let config = cli.server_config()?;
    tracing::debug!(?config, "Starting tpanel");
    tpanel_axum::start_server(config).await
}
