//! セッション破棄のスケジューラ
//!
//! `match_ended` の送信後、猶予時間を置いてから `GameWorld::finish_exit` を実行します。
//! 猶予中のタスクはマッチ ID ごとに保持し、シャットダウン時に中断します。

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};

use super::{EffectDispatcher, SharedWorld};
use crate::domain::MatchId;

pub struct SessionTeardownScheduler {
    world: SharedWorld,
    dispatcher: Arc<EffectDispatcher>,
    exit_grace: Duration,
    pending: Mutex<HashMap<MatchId, JoinHandle<()>>>,
}

impl SessionTeardownScheduler {
    pub fn new(world: SharedWorld, dispatcher: Arc<EffectDispatcher>, exit_grace: Duration) -> Self {
        Self {
            world,
            dispatcher,
            exit_grace,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn exit_grace(&self) -> Duration {
        self.exit_grace
    }

    /// 猶予後の破棄を予約（同じマッチの予約が既にあれば何もしない）
    pub async fn schedule(self: &Arc<Self>, match_id: MatchId) {
        // 予約テーブルのロックを保持したまま spawn し、タスク側の削除と順序を揃える
        let mut pending = self.pending.lock().await;
        if pending.contains_key(&match_id) {
            tracing::debug!("Teardown of session {} is already scheduled", match_id);
            return;
        }

        let scheduler = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(scheduler.exit_grace).await;
            scheduler.run_teardown(match_id).await;
        });
        pending.insert(match_id, handle);
        tracing::debug!(
            "Scheduled teardown of session {} in {:?}",
            match_id,
            self.exit_grace
        );
    }

    pub async fn schedule_all(self: &Arc<Self>, match_ids: Vec<MatchId>) {
        for match_id in match_ids {
            self.schedule(match_id).await;
        }
    }

    /// 予約中の破棄の数
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn run_teardown(&self, match_id: MatchId) {
        self.pending.lock().await.remove(&match_id);

        let mut world = self.world.lock().await;
        let effects = world.finish_exit(match_id);
        let followups = self.dispatcher.dispatch(effects).await;
        if !followups.is_empty() {
            tracing::warn!(
                "Teardown of session {} requested further teardowns: {:?}",
                match_id,
                followups
            );
        }
    }

    /// 予約中の破棄を全て中断
    pub async fn shutdown(&self) {
        let mut pending = self.pending.lock().await;
        for (match_id, handle) in pending.drain() {
            handle.abort();
            tracing::debug!("Aborted pending teardown of session {}", match_id);
        }
    }
}
