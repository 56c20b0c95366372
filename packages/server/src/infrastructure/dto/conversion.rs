//! Conversion logic between DTOs and domain models.

use matchroom_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    MatchInfo, PlayerInfo, PlayerScore, RegisteredPlayer, ServerEvent, SessionPhase,
    SessionPlayerData, SessionSummary, WorldSnapshot,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain → WebSocket DTO
// ========================================

impl From<PlayerInfo> for dto::PlayerInfoDto {
    fn from(model: PlayerInfo) -> Self {
        Self {
            player_index: model.player_index.value(),
            ready: model.ready,
            match_id: model.match_id.map(|id| id.to_string()),
        }
    }
}

impl From<MatchInfo> for dto::MatchInfoDto {
    fn from(model: MatchInfo) -> Self {
        Self {
            match_id: model.match_id.to_string(),
            players: model.players,
            max_players: model.max_players,
        }
    }
}

impl From<PlayerScore> for dto::PlayerScoreDto {
    fn from(model: PlayerScore) -> Self {
        Self {
            player_index: model.player_index.value(),
            wins: model.wins,
        }
    }
}

fn convert_all<T, U: From<T>>(items: Vec<T>) -> Vec<U> {
    items.into_iter().map(U::from).collect()
}

impl From<ServerEvent> for dto::ServerMessage {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::Connected { player_index } => Self::Connected {
                player_index: player_index.value(),
            },
            ServerEvent::MatchList { matches } => Self::MatchList {
                matches: convert_all(matches),
            },
            ServerEvent::Created { match_id, players } => Self::Created {
                match_id: match_id.to_string(),
                players: convert_all(players),
            },
            ServerEvent::Cancelled => Self::Cancelled,
            ServerEvent::Joined { match_id, players } => Self::Joined {
                match_id: match_id.to_string(),
                players: convert_all(players),
            },
            ServerEvent::Departed => Self::Departed,
            ServerEvent::UpdateRoom { players } => Self::UpdateRoom {
                players: convert_all(players),
            },
            ServerEvent::Started => Self::Started,
            ServerEvent::CellClaimed { cell, player_index } => Self::CellClaimed {
                cell: cell.to_string(),
                player_index: player_index.value(),
            },
            ServerEvent::GameWon { winner } => Self::GameWon {
                winner: winner.value(),
            },
            ServerEvent::GameDraw => Self::GameDraw,
            ServerEvent::GameRestarted => Self::GameRestarted,
            ServerEvent::TurnChanged { player_index } => Self::TurnChanged {
                player_index: player_index.value(),
            },
            ServerEvent::ScoresUpdated { players } => Self::ScoresUpdated {
                players: convert_all(players),
            },
            ServerEvent::MatchEnded => Self::MatchEnded,
        }
    }
}

// ========================================
// Domain → HTTP DTO
// ========================================

impl From<RegisteredPlayer> for http::PlayerDetailDto {
    fn from(model: RegisteredPlayer) -> Self {
        Self {
            connection_id: model.connection_id.into_string(),
            player_index: model.info.player_index.value(),
            ready: model.info.ready,
            match_id: model.info.match_id.map(|id| id.to_string()),
            connected_at: timestamp_to_rfc3339(model.connected_at.value()),
        }
    }
}

impl From<SessionPlayerData> for http::SessionPlayerDto {
    fn from(model: SessionPlayerData) -> Self {
        Self {
            connection_id: model.connection_id.into_string(),
            player_index: model.player_index.value(),
            wins: model.wins,
            claimed_cells: model.current_score.cells().map(|c| c.to_string()).collect(),
        }
    }
}

fn phase_name(phase: SessionPhase) -> String {
    match phase {
        SessionPhase::AwaitingPlayers => "awaiting_players".to_string(),
        SessionPhase::InProgress => "in_progress".to_string(),
        SessionPhase::Concluded(crate::domain::GameOutcome::Draw) => "draw".to_string(),
        SessionPhase::Concluded(crate::domain::GameOutcome::Won(_)) => "won".to_string(),
        SessionPhase::Exiting => "exiting".to_string(),
    }
}

impl From<SessionSummary> for http::SessionDetailDto {
    fn from(model: SessionSummary) -> Self {
        Self {
            match_id: model.match_id.to_string(),
            players: convert_all(model.players),
            phase: phase_name(model.phase),
            turn: model.turn.map(|index| index.value()),
        }
    }
}

impl From<WorldSnapshot> for http::LobbySnapshotDto {
    fn from(model: WorldSnapshot) -> Self {
        Self {
            players: convert_all(model.players),
            waiting: model
                .waiting
                .into_iter()
                .map(|conn| conn.into_string())
                .collect(),
            open_matches: convert_all(model.open_matches),
            sessions: convert_all(model.sessions),
        }
    }
}
