//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `"type"`.

use serde::{Deserialize, Serialize};

use crate::domain::ServerMatchOperation;

/// Messages sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Lobby intent (create / cancel / start / join / leave / ready)
    Match {
        operation: ServerMatchOperation,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        match_id: Option<String>,
    },
    MakeMove {
        cell: String,
    },
    RequestRematch,
    RequestExit,
}

/// Player info inside lobby messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfoDto {
    pub player_index: i32,
    pub ready: bool,
    pub match_id: Option<String>,
}

/// Open match entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfoDto {
    pub match_id: String,
    pub players: u8,
    pub max_players: u8,
}

/// Running win counter of a session player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScoreDto {
    pub player_index: i32,
    pub wins: u32,
}

/// Messages pushed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected {
        player_index: i32,
    },
    MatchList {
        matches: Vec<MatchInfoDto>,
    },
    Created {
        match_id: String,
        players: Vec<PlayerInfoDto>,
    },
    Cancelled,
    Joined {
        match_id: String,
        players: Vec<PlayerInfoDto>,
    },
    Departed,
    UpdateRoom {
        players: Vec<PlayerInfoDto>,
    },
    Started,
    CellClaimed {
        cell: String,
        player_index: i32,
    },
    GameWon {
        winner: i32,
    },
    GameDraw,
    GameRestarted,
    TurnChanged {
        player_index: i32,
    },
    ScoresUpdated {
        players: Vec<PlayerScoreDto>,
    },
    MatchEnded,
}
