//! UseCase: ロビー状態の取得（HTTP API 用）

use super::SharedWorld;
use crate::domain::{MatchInfo, WorldSnapshot};

pub struct GetLobbyStateUseCase {
    world: SharedWorld,
}

impl GetLobbyStateUseCase {
    pub fn new(world: SharedWorld) -> Self {
        Self { world }
    }

    /// 接続・待機・公開マッチ・セッションの全体スナップショット
    pub async fn execute(&self) -> WorldSnapshot {
        self.world.lock().await.snapshot()
    }

    /// 参加可能な公開マッチ一覧
    pub async fn open_matches(&self) -> Vec<MatchInfo> {
        self.world.lock().await.registry().open_matches()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ServerMatchOperation, SessionPhase},
        usecase::test_support::Harness,
    };

    #[tokio::test]
    async fn test_snapshot_lists_players_and_sessions() {
        // テスト項目: スナップショットに接続とセッションが含まれる
        // given (前提条件):
        let harness = Harness::new();
        let (_alice, _bob, match_id) = harness.start_session().await;
        let carol = harness.connect_client().await;
        let usecase = GetLobbyStateUseCase::new(harness.world.clone());

        // when (操作):
        let snapshot = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(snapshot.players.len(), 3);
        assert_eq!(snapshot.waiting, vec![carol.id.clone()]);
        assert_eq!(snapshot.sessions.len(), 1);
        assert_eq!(snapshot.sessions[0].match_id, match_id);
        assert_eq!(snapshot.sessions[0].phase, SessionPhase::InProgress);
    }

    #[tokio::test]
    async fn test_open_matches_lists_created_match() {
        // テスト項目: 作成されたマッチが公開一覧に含まれる
        // given (前提条件):
        let harness = Harness::new();
        let owner = harness.connect_client().await;
        harness
            .match_operation
            .execute(&owner.id, ServerMatchOperation::Create, None)
            .await;
        let usecase = GetLobbyStateUseCase::new(harness.world.clone());

        // when (操作):
        let matches = usecase.open_matches().await;

        // then (期待する結果):
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].players, 1);
    }
}
