//! UseCase テスト用の組み立て

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::{Mutex, mpsc};

use super::{
    ConnectPlayerUseCase, DisconnectPlayerUseCase, EffectDispatcher, ExitSessionUseCase,
    MakeMoveUseCase, MatchOperationUseCase, RequestRematchUseCase, SessionTeardownScheduler,
    SharedWorld,
};
use crate::{
    domain::{ConnectionId, ConnectionIdFactory, GameWorld, MatchId, ServerMatchOperation},
    infrastructure::{
        dto::websocket::ServerMessage, message_pusher::WebSocketMessagePusher,
        player_spawner::InMemoryPlayerSpawner,
    },
};
use matchroom_shared::time::FixedClock;

pub(crate) const TEST_EXIT_GRACE: Duration = Duration::from_millis(20);

/// 実装の Infrastructure を使ってすべての UseCase を組み立てたもの
pub(crate) struct Harness {
    pub world: SharedWorld,
    pub spawner: Arc<InMemoryPlayerSpawner>,
    pub teardown: Arc<SessionTeardownScheduler>,
    pub connect: ConnectPlayerUseCase,
    pub disconnect: DisconnectPlayerUseCase,
    pub match_operation: MatchOperationUseCase,
    pub make_move: MakeMoveUseCase,
    pub rematch: RequestRematchUseCase,
    pub exit: ExitSessionUseCase,
}

/// 接続したテストクライアント
pub(crate) struct TestClient {
    pub id: ConnectionId,
    pub rx: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    /// 受信済みのメッセージを全て取り出す
    pub fn drain(&mut self) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(json) = self.rx.try_recv() {
            messages.push(serde_json::from_str(&json).unwrap());
        }
        messages
    }
}

impl Harness {
    pub fn new() -> Self {
        let world: SharedWorld = Arc::new(Mutex::new(GameWorld::new()));
        let pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let spawner = Arc::new(InMemoryPlayerSpawner::new());
        let dispatcher = Arc::new(EffectDispatcher::new(pusher.clone(), spawner.clone()));
        let teardown = Arc::new(SessionTeardownScheduler::new(
            world.clone(),
            dispatcher.clone(),
            TEST_EXIT_GRACE,
        ));

        Self {
            connect: ConnectPlayerUseCase::new(
                world.clone(),
                pusher.clone(),
                dispatcher.clone(),
                Arc::new(FixedClock::new(1_700_000_000_000)),
            ),
            disconnect: DisconnectPlayerUseCase::new(
                world.clone(),
                pusher.clone(),
                spawner.clone(),
                dispatcher.clone(),
                teardown.clone(),
            ),
            match_operation: MatchOperationUseCase::new(world.clone(), dispatcher.clone()),
            make_move: MakeMoveUseCase::new(world.clone(), dispatcher.clone()),
            rematch: RequestRematchUseCase::new(world.clone(), dispatcher.clone()),
            exit: ExitSessionUseCase::new(world.clone(), dispatcher.clone(), teardown.clone()),
            world,
            spawner,
            teardown,
        }
    }

    pub async fn connect_client(&self) -> TestClient {
        let id = ConnectionIdFactory::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.connect.execute(id.clone(), tx).await.unwrap();
        TestClient { id, rx }
    }

    /// 2 人を接続し、マッチ作成〜参加〜準備〜開始まで進める
    pub async fn start_session(&self) -> (TestClient, TestClient, MatchId) {
        let mut owner = self.connect_client().await;
        let mut guest = self.connect_client().await;

        self.match_operation
            .execute(&owner.id, ServerMatchOperation::Create, None)
            .await;
        let match_id = self
            .world
            .lock()
            .await
            .registry()
            .owned_match(&owner.id)
            .unwrap();
        self.match_operation
            .execute(&guest.id, ServerMatchOperation::Join, Some(match_id))
            .await;
        for client in [&owner, &guest] {
            self.match_operation
                .execute(&client.id, ServerMatchOperation::Ready, Some(match_id))
                .await;
        }
        self.match_operation
            .execute(&owner.id, ServerMatchOperation::Start, None)
            .await;

        owner.drain();
        guest.drain();
        (owner, guest, match_id)
    }

    /// 猶予時間が経過するまで待つ
    ///
    /// `start_paused = true` のテストでは仮想時計が進むだけで、実時間は待たない。
    pub async fn wait_for_teardown(&self) {
        tokio::time::sleep(TEST_EXIT_GRACE + Duration::from_millis(1)).await;
    }
}
