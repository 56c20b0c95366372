//! UseCase: 再戦要求

use std::sync::Arc;

use super::{EffectDispatcher, SharedWorld};
use crate::domain::ConnectionId;

pub struct RequestRematchUseCase {
    world: SharedWorld,
    dispatcher: Arc<EffectDispatcher>,
}

impl RequestRematchUseCase {
    pub fn new(world: SharedWorld, dispatcher: Arc<EffectDispatcher>) -> Self {
        Self { world, dispatcher }
    }

    pub async fn execute(&self, connection_id: &ConnectionId) {
        let mut world = self.world.lock().await;
        let effects = world.request_rematch(connection_id);
        self.dispatcher.dispatch(effects).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Cell,
        infrastructure::dto::websocket::ServerMessage,
        usecase::test_support::Harness,
    };

    async fn play_to_win(harness: &Harness, first: &ConnectionId, second: &ConnectionId) {
        for (conn, cell) in [
            (first, Cell::A1),
            (second, Cell::B1),
            (first, Cell::A2),
            (second, Cell::B2),
            (first, Cell::A3),
        ] {
            harness.make_move.execute(conn, cell).await;
        }
    }

    #[tokio::test]
    async fn test_rematch_needs_both_players() {
        // テスト項目: 片方だけの再戦要求では盤面は初期化されない
        // given (前提条件):
        let harness = Harness::new();
        let (mut alice, bob, _) = harness.start_session().await;
        play_to_win(&harness, &alice.id, &bob.id).await;
        alice.drain();

        // when (操作):
        harness.rematch.execute(&alice.id).await;
        harness.rematch.execute(&alice.id).await;

        // then (期待する結果):
        assert!(alice.drain().is_empty());
    }

    #[tokio::test]
    async fn test_rematch_restarts_and_alternates_first_player() {
        // テスト項目: 両者が要求すると盤面が初期化され、先手が交代する
        // given (前提条件):
        let harness = Harness::new();
        let (mut alice, mut bob, match_id) = harness.start_session().await;
        play_to_win(&harness, &alice.id, &bob.id).await;
        alice.drain();
        bob.drain();

        // when (操作):
        harness.rematch.execute(&alice.id).await;
        harness.rematch.execute(&bob.id).await;

        // then (期待する結果):
        let expected = vec![
            ServerMessage::GameRestarted,
            ServerMessage::TurnChanged { player_index: 2 },
        ];
        assert_eq!(alice.drain(), expected);
        assert_eq!(bob.drain(), expected);
        let world = harness.world.lock().await;
        let session = world.session(&match_id).unwrap();
        assert_eq!(session.board().bits(), 0);
        assert_eq!(session.turn_holder(), Some(&bob.id));
    }

    #[tokio::test]
    async fn test_rematch_during_play_is_ignored() {
        // テスト項目: 対局中の再戦要求は無視される
        // given (前提条件):
        let harness = Harness::new();
        let (mut alice, bob, _) = harness.start_session().await;
        harness.make_move.execute(&alice.id, Cell::B2).await;
        alice.drain();

        // when (操作):
        harness.rematch.execute(&alice.id).await;
        harness.rematch.execute(&bob.id).await;

        // then (期待する結果):
        assert!(alice.drain().is_empty());
    }
}
