//! UseCase: 切断処理
//!
//! 購読中のセッションへ切断を通知して終了シーケンスを始め、
//! ロビーから接続を取り除きます。

use std::sync::Arc;

use super::{DisconnectError, EffectDispatcher, SessionTeardownScheduler, SharedWorld};
use crate::domain::{ConnectionId, MessagePusher, PlayerSpawner};

pub struct DisconnectPlayerUseCase {
    world: SharedWorld,
    message_pusher: Arc<dyn MessagePusher>,
    player_spawner: Arc<dyn PlayerSpawner>,
    dispatcher: Arc<EffectDispatcher>,
    teardown: Arc<SessionTeardownScheduler>,
}

impl DisconnectPlayerUseCase {
    pub fn new(
        world: SharedWorld,
        message_pusher: Arc<dyn MessagePusher>,
        player_spawner: Arc<dyn PlayerSpawner>,
        dispatcher: Arc<EffectDispatcher>,
        teardown: Arc<SessionTeardownScheduler>,
    ) -> Self {
        Self {
            world,
            message_pusher,
            player_spawner,
            dispatcher,
            teardown,
        }
    }

    pub async fn execute(&self, connection_id: &ConnectionId) -> Result<(), DisconnectError> {
        // 切断済みの相手へは送らない
        self.message_pusher.unregister_client(connection_id).await;

        let mut world = self.world.lock().await;
        if !world.registry().is_connected(connection_id) {
            return Err(DisconnectError::UnknownConnection(
                connection_id.to_string(),
            ));
        }

        let effects = world.connection_lost(connection_id);
        let teardowns = self.dispatcher.dispatch(effects).await;
        self.teardown.schedule_all(teardowns).await;
        self.player_spawner.despawn_player(connection_id).await;
        Ok(())
    }
}
