//! Axum server exposing the lobby over WebSocket and a small HTTP API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
