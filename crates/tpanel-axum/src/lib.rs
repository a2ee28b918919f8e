//! Axum transport for tpanel.
//!
//! Serves the observer WebSocket at `/ws`, a one-shot status read at
//! `/api/status` and, optionally, a static web UI. All domain work is
//! delegated to `tpanel-runtime`.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{AxumContext, ServerConfig, bootstrap, start_server};
pub use routes::{create_router, create_spa_router};
pub use state::AppState;
