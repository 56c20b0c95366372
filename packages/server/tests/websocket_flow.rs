//! End-to-end lobby and session flow against an in-process server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use matchroom_server::{
    config::ServerConfig,
    domain::ServerMatchOperation,
    infrastructure::dto::{
        http::LobbySnapshotDto,
        websocket::{ClientMessage, MatchInfoDto, ServerMessage},
    },
    ui::Server,
};
use reqwest::StatusCode;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

struct TestServer {
    port: u16,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let config = ServerConfig {
            exit_grace: Duration::from_millis(20),
            ..ServerConfig::default()
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = oneshot::channel::<()>();

        let server = Server::new(&config);
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async move {
                    let _ = rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            port,
            shutdown: Some(tx),
            handle,
        }
    }

    async fn connect(&self) -> Client {
        let (ws, _) = connect_async(format!("ws://127.0.0.1:{}/ws", self.port))
            .await
            .unwrap();
        ws
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(RECV_TIMEOUT, self.handle)
            .await
            .unwrap()
            .unwrap();
    }
}

async fn send(ws: &mut Client, message: ClientMessage) {
    let json = serde_json::to_string(&message).unwrap();
    ws.send(Message::text(json)).await.unwrap();
}

async fn recv(ws: &mut Client) -> ServerMessage {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a server message")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

fn lobby(operation: ServerMatchOperation, match_id: Option<&str>) -> ClientMessage {
    ClientMessage::Match {
        operation,
        match_id: match_id.map(str::to_string),
    }
}

#[tokio::test]
async fn test_two_players_create_join_play_and_exit() {
    // テスト項目: 2 人の接続から作成・参加・準備・開始・着手・終了までが通しで動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    assert_eq!(recv(&mut alice).await, ServerMessage::Connected { player_index: 1 });
    assert_eq!(recv(&mut alice).await, ServerMessage::MatchList { matches: vec![] });
    let mut bob = server.connect().await;
    assert_eq!(recv(&mut bob).await, ServerMessage::Connected { player_index: 2 });
    assert_eq!(recv(&mut bob).await, ServerMessage::MatchList { matches: vec![] });

    // when (操作): alice がマッチを作成
    send(&mut alice, lobby(ServerMatchOperation::Create, None)).await;

    // then (期待する結果):
    let ServerMessage::Created { match_id, players } = recv(&mut alice).await else {
        panic!("expected created");
    };
    assert_eq!(players.len(), 1);
    let ServerMessage::MatchList { matches } = recv(&mut bob).await else {
        panic!("expected match_list");
    };
    assert_eq!(matches[0].match_id, match_id);

    // when (操作): bob が参加し、両者が準備完了
    send(&mut bob, lobby(ServerMatchOperation::Join, Some(&match_id))).await;

    // then (期待する結果):
    assert!(matches!(recv(&mut bob).await, ServerMessage::Joined { .. }));
    assert!(matches!(recv(&mut bob).await, ServerMessage::UpdateRoom { ref players } if players.len() == 2));
    assert!(matches!(recv(&mut alice).await, ServerMessage::UpdateRoom { ref players } if players.len() == 2));

    for ws in [&mut alice, &mut bob] {
        send(ws, lobby(ServerMatchOperation::Ready, Some(&match_id))).await;
    }
    for _ in 0..2 {
        assert!(matches!(recv(&mut alice).await, ServerMessage::UpdateRoom { .. }));
        assert!(matches!(recv(&mut bob).await, ServerMessage::UpdateRoom { .. }));
    }

    // when (操作): alice が開始
    send(&mut alice, lobby(ServerMatchOperation::Start, None)).await;

    // then (期待する結果):
    for ws in [&mut alice, &mut bob] {
        assert_eq!(recv(ws).await, ServerMessage::Started);
        assert!(matches!(recv(ws).await, ServerMessage::ScoresUpdated { .. }));
        assert_eq!(recv(ws).await, ServerMessage::TurnChanged { player_index: 1 });
    }

    // when (操作): alice が中央を取る
    send(
        &mut alice,
        ClientMessage::MakeMove {
            cell: "b2".to_string(),
        },
    )
    .await;

    // then (期待する結果):
    for ws in [&mut alice, &mut bob] {
        assert_eq!(
            recv(ws).await,
            ServerMessage::CellClaimed {
                cell: "B2".to_string(),
                player_index: 1,
            }
        );
        assert_eq!(recv(ws).await, ServerMessage::TurnChanged { player_index: 2 });
    }

    // when (操作): bob が終了要求
    send(&mut bob, ClientMessage::RequestExit).await;

    // then (期待する結果): 両者に match_ended、猶予後にロビーの一覧が届く
    for ws in [&mut alice, &mut bob] {
        assert_eq!(recv(ws).await, ServerMessage::MatchEnded);
        assert_eq!(recv(ws).await, ServerMessage::MatchList { matches: vec![] });
    }

    drop(alice);
    drop(bob);
    server.stop().await;
}

#[tokio::test]
async fn test_malformed_frame_is_ignored() {
    // テスト項目: 解釈できないフレームは破棄され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    recv(&mut alice).await;
    recv(&mut alice).await;

    // when (操作):
    alice
        .send(Message::text(r#"{"type":"make_move","cell":"Z9"}"#))
        .await
        .unwrap();
    alice.send(Message::text("not json")).await.unwrap();
    send(&mut alice, lobby(ServerMatchOperation::Create, None)).await;

    // then (期待する結果):
    assert!(matches!(recv(&mut alice).await, ServerMessage::Created { .. }));

    drop(alice);
    server.stop().await;
}

#[tokio::test]
async fn test_http_endpoints() {
    // テスト項目: ヘルスチェック・公開マッチ一覧・デバッグ用スナップショットが JSON で返る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    recv(&mut alice).await;
    recv(&mut alice).await;
    send(&mut alice, lobby(ServerMatchOperation::Create, None)).await;
    let ServerMessage::Created { match_id, .. } = recv(&mut alice).await else {
        panic!("expected created");
    };
    let client = reqwest::Client::new();

    // when (操作):
    let health = client
        .get(server.http_url("/api/health"))
        .send()
        .await
        .unwrap();
    let matches = client
        .get(server.http_url("/api/matches"))
        .send()
        .await
        .unwrap();
    let debug = client
        .get(server.http_url("/debug/lobby"))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(
        health.json::<serde_json::Value>().await.unwrap(),
        serde_json::json!({"status": "ok"})
    );

    assert_eq!(matches.status(), StatusCode::OK);
    assert_eq!(
        matches.json::<Vec<MatchInfoDto>>().await.unwrap(),
        vec![MatchInfoDto {
            match_id: match_id.clone(),
            players: 1,
            max_players: 2,
        }]
    );

    assert_eq!(debug.status(), StatusCode::OK);
    let snapshot = debug.json::<LobbySnapshotDto>().await.unwrap();
    assert_eq!(snapshot.players.len(), 1);
    assert_eq!(snapshot.players[0].match_id, Some(match_id));
    assert!(snapshot.waiting.is_empty());
    assert!(snapshot.sessions.is_empty());

    drop(alice);
    server.stop().await;
}

#[tokio::test]
async fn test_plain_http_request_to_ws_registers_nobody() {
    // テスト項目: アップグレードされなかった /ws へのリクエストではプレイヤーが登録されない
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client.get(server.http_url("/ws")).send().await.unwrap();

    // then (期待する結果):
    assert!(response.status().is_client_error());
    let snapshot = client
        .get(server.http_url("/debug/lobby"))
        .send()
        .await
        .unwrap()
        .json::<LobbySnapshotDto>()
        .await
        .unwrap();
    assert!(snapshot.players.is_empty());
    assert!(snapshot.waiting.is_empty());

    server.stop().await;
}
