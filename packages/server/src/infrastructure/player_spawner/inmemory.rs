//! InMemory PlayerSpawner 実装
//!
//! 接続ごとのプレイヤーエンティティを「所属マッチ ID」だけを持つ行として保持します。
//! マッチ ID はエンティティの所有権の分割（どのセッションの対局者か）にのみ使われます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MatchId, PlayerSpawner};

#[derive(Default)]
pub struct InMemoryPlayerSpawner {
    entities: Mutex<HashMap<ConnectionId, MatchId>>,
}

impl InMemoryPlayerSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生成済みエンティティ数
    pub async fn count(&self) -> usize {
        self.entities.lock().await.len()
    }
}

#[async_trait]
impl PlayerSpawner for InMemoryPlayerSpawner {
    async fn spawn_player(&self, connection_id: &ConnectionId, match_id: MatchId) {
        let mut entities = self.entities.lock().await;
        if let Some(previous) = entities.insert(connection_id.clone(), match_id) {
            tracing::warn!(
                "Connection '{}' already had a player in match {}, replaced",
                connection_id,
                previous
            );
        }
        tracing::debug!(
            "Spawned player for connection '{}' in match {}",
            connection_id,
            match_id
        );
    }

    async fn despawn_player(&self, connection_id: &ConnectionId) {
        let mut entities = self.entities.lock().await;
        if entities.remove(connection_id).is_some() {
            tracing::debug!("Despawned player for connection '{}'", connection_id);
        }
    }
}
