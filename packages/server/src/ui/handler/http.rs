//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::{http::LobbySnapshotDto, websocket::MatchInfoDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Open matches a player can join
pub async fn get_matches(State(state): State<Arc<AppState>>) -> Json<Vec<MatchInfoDto>> {
    let matches = state.get_lobby_state_usecase.open_matches().await;

    // Domain Model から DTO への変換
    Json(matches.into_iter().map(MatchInfoDto::from).collect())
}

/// Debug endpoint dumping the whole lobby and session state
pub async fn debug_lobby_state(State(state): State<Arc<AppState>>) -> Json<LobbySnapshotDto> {
    let snapshot = state.get_lobby_state_usecase.execute().await;
    Json(LobbySnapshotDto::from(snapshot))
}
