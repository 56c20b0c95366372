//! UseCase: 接続準備完了
//!
//! トランスポートが払い出した接続をロビーの待機プールへ登録し、
//! 自分のプレイヤー番号と現在のマッチ一覧を送信します。

use std::sync::Arc;

use matchroom_shared::time::Clock;

use super::{ConnectError, EffectDispatcher, SharedWorld};
use crate::domain::{ConnectionId, MessagePusher, PusherChannel, Timestamp};

pub struct ConnectPlayerUseCase {
    world: SharedWorld,
    message_pusher: Arc<dyn MessagePusher>,
    dispatcher: Arc<EffectDispatcher>,
    clock: Arc<dyn Clock>,
}

impl ConnectPlayerUseCase {
    pub fn new(
        world: SharedWorld,
        message_pusher: Arc<dyn MessagePusher>,
        dispatcher: Arc<EffectDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            world,
            message_pusher,
            dispatcher,
            clock,
        }
    }

    /// 接続を登録
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続時刻
    /// * `Err(ConnectError::DuplicateConnection)` - 同じ ID が登録済み
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let mut world = self.world.lock().await;
        if world.registry().is_connected(&connection_id) {
            return Err(ConnectError::DuplicateConnection(connection_id.into_string()));
        }

        // 最初の通知より前に送信チャンネルを登録する
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        let connected_at = Timestamp::new(self.clock.now_millis());
        let effects = world.connection_ready(&connection_id, connected_at);
        self.dispatcher.dispatch(effects).await;
        Ok(connected_at)
    }
}
