//! UseCase: セッション終了要求
//!
//! 参加者全員に `match_ended` を送り、猶予時間の経過後にセッションを破棄して
//! 参加者をロビーへ戻します。

use std::sync::Arc;

use super::{EffectDispatcher, SessionTeardownScheduler, SharedWorld};
use crate::domain::ConnectionId;

pub struct ExitSessionUseCase {
    world: SharedWorld,
    dispatcher: Arc<EffectDispatcher>,
    teardown: Arc<SessionTeardownScheduler>,
}

impl ExitSessionUseCase {
    pub fn new(
        world: SharedWorld,
        dispatcher: Arc<EffectDispatcher>,
        teardown: Arc<SessionTeardownScheduler>,
    ) -> Self {
        Self {
            world,
            dispatcher,
            teardown,
        }
    }

    pub async fn execute(&self, connection_id: &ConnectionId) {
        let mut world = self.world.lock().await;
        let effects = world.request_exit(connection_id);
        let teardowns = self.dispatcher.dispatch(effects).await;
        self.teardown.schedule_all(teardowns).await;
    }
}
