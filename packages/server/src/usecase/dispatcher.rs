//! ドメインが返した `Effect` をトランスポートへ反映する
//!
//! - `Send`: `ServerMessage` DTO に変換して JSON でプッシュ
//! - `SpawnPlayer` / `DespawnPlayer`: `PlayerSpawner` へ委譲
//! - `ScheduleTeardown`: 呼び出し元へ返す（タイマーは `SessionTeardownScheduler` が持つ）

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, Effect, MatchId, MessagePusher, PlayerSpawner, ServerEvent},
    infrastructure::dto::websocket::ServerMessage,
};

pub struct EffectDispatcher {
    message_pusher: Arc<dyn MessagePusher>,
    player_spawner: Arc<dyn PlayerSpawner>,
}

impl EffectDispatcher {
    pub fn new(
        message_pusher: Arc<dyn MessagePusher>,
        player_spawner: Arc<dyn PlayerSpawner>,
    ) -> Self {
        Self {
            message_pusher,
            player_spawner,
        }
    }

    /// 副作用を順に実行し、破棄を予約すべきセッションを返す
    pub async fn dispatch(&self, effects: Vec<Effect>) -> Vec<MatchId> {
        let mut teardowns = Vec::new();
        for effect in effects {
            match effect {
                Effect::Send { to, event } => self.send(&to, event).await,
                Effect::SpawnPlayer {
                    connection,
                    match_id,
                } => self.player_spawner.spawn_player(&connection, match_id).await,
                Effect::DespawnPlayer { connection } => {
                    self.player_spawner.despawn_player(&connection).await
                }
                Effect::ScheduleTeardown { match_id } => teardowns.push(match_id),
            }
        }
        teardowns
    }

    async fn send(&self, to: &ConnectionId, event: ServerEvent) {
        if let Some(operation) = event.lobby_operation() {
            tracing::debug!("Sending {:?} to '{}'", operation, to);
        }

        let message = ServerMessage::from(event);
        let json = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize message for '{}': {}", to, e);
                return;
            }
        };

        // 切断済みの相手への送信失敗は操作を中断しない
        if let Err(e) = self.message_pusher.push_to(to, &json).await {
            tracing::warn!("Failed to push message to '{}': {}", to, e);
        }
    }
}
