//! HTTP and WebSocket handlers.

pub mod action;
pub mod status;
pub mod ws;
