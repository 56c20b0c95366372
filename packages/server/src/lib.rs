//! Two-player match lobby and tic-tac-toe session server.
//!
//! Clients connect over WebSocket, browse and create matches in the lobby,
//! and play server-authoritative tic-tac-toe sessions once both players are ready.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
