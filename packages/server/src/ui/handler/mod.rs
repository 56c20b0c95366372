//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{debug_lobby_state, get_matches, health_check};
pub use websocket::websocket_handler;
