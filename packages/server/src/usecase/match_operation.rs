//! UseCase: ロビー操作（作成・取り消し・開始・参加・離脱・準備）

use std::sync::Arc;

use super::{EffectDispatcher, SharedWorld};
use crate::domain::{ConnectionId, MatchId, ServerMatchOperation};

pub struct MatchOperationUseCase {
    world: SharedWorld,
    dispatcher: Arc<EffectDispatcher>,
}

impl MatchOperationUseCase {
    pub fn new(world: SharedWorld, dispatcher: Arc<EffectDispatcher>) -> Self {
        Self { world, dispatcher }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        operation: ServerMatchOperation,
        match_id: Option<MatchId>,
    ) {
        let mut world = self.world.lock().await;
        let effects = world.handle_match_operation(connection_id, operation, match_id);
        self.dispatcher.dispatch(effects).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::dto::websocket::{MatchInfoDto, PlayerInfoDto, ServerMessage},
        usecase::test_support::Harness,
    };

    #[tokio::test]
    async fn test_create_notifies_owner_and_waiting_pool() {
        // テスト項目: 作成者には Created、待機中の接続には新しい一覧が届く
        // given (前提条件):
        let harness = Harness::new();
        let mut owner = harness.connect_client().await;
        let mut other = harness.connect_client().await;
        owner.drain();
        other.drain();

        // when (操作):
        harness
            .match_operation
            .execute(&owner.id, ServerMatchOperation::Create, None)
            .await;

        // then (期待する結果):
        let match_id = harness
            .world
            .lock()
            .await
            .registry()
            .owned_match(&owner.id)
            .unwrap()
            .to_string();
        assert_eq!(
            owner.drain(),
            vec![ServerMessage::Created {
                match_id: match_id.clone(),
                players: vec![PlayerInfoDto {
                    player_index: 1,
                    ready: false,
                    match_id: Some(match_id.clone()),
                }],
            }]
        );
        assert_eq!(
            other.drain(),
            vec![ServerMessage::MatchList {
                matches: vec![MatchInfoDto {
                    match_id,
                    players: 1,
                    max_players: 2,
                }],
            }]
        );
    }

    #[tokio::test]
    async fn test_cancel_sends_cancelled_then_departed() {
        // テスト項目: 取り消しは所有者に Cancelled、所属者全員に Departed を送る
        // given (前提条件):
        let harness = Harness::new();
        let mut owner = harness.connect_client().await;
        harness
            .match_operation
            .execute(&owner.id, ServerMatchOperation::Create, None)
            .await;
        owner.drain();

        // when (操作):
        harness
            .match_operation
            .execute(&owner.id, ServerMatchOperation::Cancel, None)
            .await;

        // then (期待する結果):
        assert_eq!(
            owner.drain(),
            vec![
                ServerMessage::Cancelled,
                ServerMessage::Departed,
                ServerMessage::MatchList { matches: vec![] },
            ]
        );
    }

    #[tokio::test]
    async fn test_start_requires_everyone_ready() {
        // テスト項目: 全員が準備完了でなければ開始されない
        // given (前提条件):
        let harness = Harness::new();
        let mut owner = harness.connect_client().await;
        let guest = harness.connect_client().await;
        harness
            .match_operation
            .execute(&owner.id, ServerMatchOperation::Create, None)
            .await;
        let match_id = harness
            .world
            .lock()
            .await
            .registry()
            .owned_match(&owner.id)
            .unwrap();
        harness
            .match_operation
            .execute(&guest.id, ServerMatchOperation::Join, Some(match_id))
            .await;
        harness
            .match_operation
            .execute(&owner.id, ServerMatchOperation::Ready, Some(match_id))
            .await;
        owner.drain();

        // when (操作):
        harness
            .match_operation
            .execute(&owner.id, ServerMatchOperation::Start, None)
            .await;

        // then (期待する結果):
        assert!(owner.drain().is_empty());
        assert!(harness.world.lock().await.session(&match_id).is_none());
    }

    #[tokio::test]
    async fn test_start_spawns_players_and_begins_session() {
        // テスト項目: 開始すると両者のエンティティが生成され、手番が通知される
        // given (前提条件):
        let harness = Harness::new();

        // when (操作):
        let (_owner, _guest, match_id) = harness.start_session().await;

        // then (期待する結果):
        assert_eq!(harness.spawner.count().await, 2);
        let world = harness.world.lock().await;
        assert!(world.session(&match_id).is_some());
        assert!(world.is_subscribed(&match_id));
        assert!(world.registry().open_matches().is_empty());
    }
}
