//! ロビーとセッションを束ねるサーバー権威の状態
//!
//! `StartMatch` でレジストリからセッションへ、終了シーケンスと切断で
//! セッションからレジストリへ接続を受け渡します。
//! 全ての操作は `&mut self` で逐次実行される前提です。

use std::collections::HashMap;

use serde::Serialize;

use super::{
    GameSession, MatchInfo, MatchRegistry, MoveOutcome, RegisteredPlayer, Seat, SessionPhase,
    SessionPlayerData,
};
use crate::domain::{
    Cell, ConnectionId, DisconnectSubscribers, Effect, MatchId, Outbox, PlayerIndex,
    ServerMatchOperation, Timestamp,
};

/// セッションの概要（デバッグ表示用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub match_id: MatchId,
    pub players: Vec<SessionPlayerData>,
    pub phase: SessionPhase,
    pub turn: Option<PlayerIndex>,
}

/// 全体のスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldSnapshot {
    pub players: Vec<RegisteredPlayer>,
    pub waiting: Vec<ConnectionId>,
    pub open_matches: Vec<MatchInfo>,
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Default)]
pub struct GameWorld {
    registry: MatchRegistry,
    sessions: HashMap<MatchId, GameSession>,
    disconnect_subscribers: DisconnectSubscribers,
}

impl GameWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全状態を破棄
    pub fn shutdown(&mut self) {
        self.registry.shutdown();
        self.sessions.clear();
        self.disconnect_subscribers.clear();
        tracing::info!("Game world shut down");
    }

    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    pub fn session(&self, match_id: &MatchId) -> Option<&GameSession> {
        self.sessions.get(match_id)
    }

    pub fn is_subscribed(&self, match_id: &MatchId) -> bool {
        self.disconnect_subscribers.is_subscribed(match_id)
    }

    /// 接続が参加しているセッション
    pub fn session_of(&self, connection_id: &ConnectionId) -> Option<&GameSession> {
        self.sessions
            .values()
            .find(|session| session.seat_of(connection_id).is_some())
    }

    fn session_id_of(&self, connection_id: &ConnectionId) -> Option<MatchId> {
        self.session_of(connection_id).map(GameSession::match_id)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let mut sessions: Vec<SessionSummary> = self
            .sessions
            .values()
            .map(|session| SessionSummary {
                match_id: session.match_id(),
                players: [Seat::Player1, Seat::Player2]
                    .into_iter()
                    .map(|seat| session.player(seat).clone())
                    .collect(),
                phase: session.phase(),
                turn: session
                    .current_seat()
                    .map(|seat| session.player(seat).player_index),
            })
            .collect();
        sessions.sort_by_key(|s| s.match_id);

        WorldSnapshot {
            players: self.registry.registered_players(),
            waiting: self.registry.waiting().to_vec(),
            open_matches: self.registry.open_matches(),
            sessions,
        }
    }

    // ========================================
    // 接続ライフサイクル
    // ========================================

    pub fn connection_ready(
        &mut self,
        connection_id: &ConnectionId,
        connected_at: Timestamp,
    ) -> Vec<Effect> {
        let mut out = Outbox::new();
        let info = self
            .registry
            .connection_ready(connection_id, connected_at, &mut out);
        tracing::info!(
            "Connection '{}' ready as player {}",
            connection_id,
            info.player_index.value()
        );
        out.into_effects()
    }

    /// 切断：購読中のセッションに通知してから、ロビーから取り除く
    pub fn connection_lost(&mut self, connection_id: &ConnectionId) -> Vec<Effect> {
        let mut out = Outbox::new();

        for match_id in self.disconnect_subscribers.snapshot() {
            let is_participant = self
                .sessions
                .get(&match_id)
                .is_some_and(|s| s.seat_of(connection_id).is_some());
            if is_participant {
                tracing::info!(
                    "Participant '{}' of session {} disconnected",
                    connection_id,
                    match_id
                );
                self.begin_exit(match_id, Some(connection_id), &mut out);
            }
        }

        self.registry.connection_lost(connection_id, &mut out);
        out.into_effects()
    }

    // ========================================
    // ロビー操作
    // ========================================

    pub fn handle_match_operation(
        &mut self,
        connection_id: &ConnectionId,
        operation: ServerMatchOperation,
        match_id: Option<MatchId>,
    ) -> Vec<Effect> {
        let mut out = Outbox::new();
        if self.session_id_of(connection_id).is_some() {
            tracing::debug!(
                "Ignoring {:?} from '{}': connection is in a session",
                operation,
                connection_id
            );
            return out.into_effects();
        }

        match (operation, match_id) {
            (ServerMatchOperation::None, _) => {
                tracing::warn!("Missing ServerMatchOperation from '{}'", connection_id);
            }
            (ServerMatchOperation::Create, _) => {
                self.registry.create_match(connection_id, &mut out);
            }
            (ServerMatchOperation::Cancel, _) => {
                self.registry.cancel_match(connection_id, &mut out);
            }
            (ServerMatchOperation::Start, _) => {
                self.start_match(connection_id, &mut out);
            }
            (ServerMatchOperation::Join, Some(id)) => {
                self.registry.join_match(connection_id, id, &mut out);
            }
            (ServerMatchOperation::Leave, Some(id)) => {
                self.registry.leave_match(connection_id, id, &mut out);
            }
            (ServerMatchOperation::Ready, Some(id)) => {
                self.registry.toggle_ready(connection_id, id, &mut out);
            }
            (op, None) => {
                tracing::debug!("Ignoring {:?} from '{}': missing match id", op, connection_id);
            }
        }
        out.into_effects()
    }

    fn start_match(&mut self, connection_id: &ConnectionId, out: &mut Outbox) {
        let Some((match_id, [first, second])) =
            self.registry.take_startable_match(connection_id, out)
        else {
            return;
        };

        let (Some(info1), Some(info2)) = (
            self.registry.player_info(&first),
            self.registry.player_info(&second),
        ) else {
            return;
        };

        for conn in [&first, &second] {
            out.push(Effect::SpawnPlayer {
                connection: conn.clone(),
                match_id,
            });
        }

        let mut session = GameSession::new(
            match_id,
            SessionPlayerData::new(first, info1.player_index),
            SessionPlayerData::new(second, info2.player_index),
        );
        session.begin(out);
        self.sessions.insert(match_id, session);
        self.disconnect_subscribers.subscribe(match_id);
        tracing::info!("Session {} started", match_id);
    }

    // ========================================
    // セッション操作
    // ========================================

    pub fn make_move(&mut self, connection_id: &ConnectionId, cell: Cell) -> Vec<Effect> {
        let mut out = Outbox::new();
        let Some(match_id) = self.session_id_of(connection_id) else {
            return out.into_effects();
        };
        if let Some(session) = self.sessions.get_mut(&match_id) {
            match session.make_move(connection_id, cell, &mut out) {
                MoveOutcome::Rejected => {
                    tracing::debug!("Rejected move {} from '{}'", cell, connection_id)
                }
                MoveOutcome::Accepted => {}
                MoveOutcome::Won => tracing::info!("Session {} won by '{}'", match_id, connection_id),
                MoveOutcome::Draw => tracing::info!("Session {} ended in a draw", match_id),
            }
        }
        out.into_effects()
    }

    pub fn request_rematch(&mut self, connection_id: &ConnectionId) -> Vec<Effect> {
        let mut out = Outbox::new();
        let Some(match_id) = self.session_id_of(connection_id) else {
            return out.into_effects();
        };
        if let Some(session) = self.sessions.get_mut(&match_id)
            && session.request_rematch(connection_id, &mut out)
        {
            tracing::info!("Session {} restarted", match_id);
        }
        out.into_effects()
    }

    /// 退出要求：終了シーケンスを開始し、猶予後の破棄を予約する
    pub fn request_exit(&mut self, connection_id: &ConnectionId) -> Vec<Effect> {
        let mut out = Outbox::new();
        if let Some(match_id) = self.session_id_of(connection_id) {
            self.begin_exit(match_id, None, &mut out);
        }
        out.into_effects()
    }

    fn begin_exit(
        &mut self,
        match_id: MatchId,
        disconnected: Option<&ConnectionId>,
        out: &mut Outbox,
    ) {
        let Some(session) = self.sessions.get_mut(&match_id) else {
            return;
        };
        if session.begin_exit(disconnected, out) {
            self.disconnect_subscribers.unsubscribe(&match_id);
            out.push(Effect::ScheduleTeardown { match_id });
        }
    }

    /// 終了シーケンスの後半：接続中の参加者だけをロビーへ戻し、セッションを破棄
    pub fn finish_exit(&mut self, match_id: MatchId) -> Vec<Effect> {
        let mut out = Outbox::new();
        let Some(session) = self.sessions.remove(&match_id) else {
            return out.into_effects();
        };
        self.disconnect_subscribers.unsubscribe(&match_id);

        for conn in session.participants() {
            if self.registry.is_connected(conn) {
                out.push(Effect::DespawnPlayer {
                    connection: conn.clone(),
                });
                self.registry.return_to_waiting(conn);
            }
        }
        self.registry.broadcast_match_list(None, &mut out);
        tracing::info!("Session {} destroyed", match_id);
        out.into_effects()
    }
}
