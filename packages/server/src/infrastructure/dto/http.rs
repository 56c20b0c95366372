//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::MatchInfoDto;

/// Connected player entry of the lobby snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDetailDto {
    pub connection_id: String,
    pub player_index: i32,
    pub ready: bool,
    pub match_id: Option<String>,
    /// RFC 3339
    pub connected_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlayerDto {
    pub connection_id: String,
    pub player_index: i32,
    pub wins: u32,
    pub claimed_cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetailDto {
    pub match_id: String,
    pub players: Vec<SessionPlayerDto>,
    pub phase: String,
    pub turn: Option<i32>,
}

/// `GET /debug/lobby`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbySnapshotDto {
    pub players: Vec<PlayerDetailDto>,
    pub waiting: Vec<String>,
    pub open_matches: Vec<MatchInfoDto>,
    pub sessions: Vec<SessionDetailDto>,
}
