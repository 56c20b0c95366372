//! Server wiring and execution logic.

use std::{collections::HashMap, future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::GameWorld,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, player_spawner::InMemoryPlayerSpawner,
    },
    usecase::{
        ConnectPlayerUseCase, DisconnectPlayerUseCase, EffectDispatcher, ExitSessionUseCase,
        GetLobbyStateUseCase, MakeMoveUseCase, MatchOperationUseCase, RequestRematchUseCase,
        SessionTeardownScheduler, SharedWorld,
    },
};
use matchroom_shared::time::SystemClock;

use super::{
    handler::{debug_lobby_state, get_matches, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Match lobby server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(&ServerConfig::default());
/// server.run().await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    world: SharedWorld,
    teardown: Arc<SessionTeardownScheduler>,
    bind_addr: String,
}

impl Server {
    /// Build the server with the in-memory game world and WebSocket transport
    pub fn new(config: &ServerConfig) -> Self {
        // Initialize dependencies in order:
        // 1. GameWorld
        // 2. MessagePusher / PlayerSpawner
        // 3. Effect dispatcher and teardown scheduler
        // 4. UseCases
        let world: SharedWorld = Arc::new(Mutex::new(GameWorld::new()));

        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let player_spawner = Arc::new(InMemoryPlayerSpawner::new());

        let dispatcher = Arc::new(EffectDispatcher::new(
            message_pusher.clone(),
            player_spawner.clone(),
        ));
        let teardown = Arc::new(SessionTeardownScheduler::new(
            world.clone(),
            dispatcher.clone(),
            config.exit_grace,
        ));

        let state = Arc::new(AppState {
            connect_player_usecase: Arc::new(ConnectPlayerUseCase::new(
                world.clone(),
                message_pusher.clone(),
                dispatcher.clone(),
                Arc::new(SystemClock),
            )),
            disconnect_player_usecase: Arc::new(DisconnectPlayerUseCase::new(
                world.clone(),
                message_pusher,
                player_spawner,
                dispatcher.clone(),
                teardown.clone(),
            )),
            match_operation_usecase: Arc::new(MatchOperationUseCase::new(
                world.clone(),
                dispatcher.clone(),
            )),
            make_move_usecase: Arc::new(MakeMoveUseCase::new(world.clone(), dispatcher.clone())),
            request_rematch_usecase: Arc::new(RequestRematchUseCase::new(
                world.clone(),
                dispatcher.clone(),
            )),
            exit_session_usecase: Arc::new(ExitSessionUseCase::new(
                world.clone(),
                dispatcher,
                teardown.clone(),
            )),
            get_lobby_state_usecase: Arc::new(GetLobbyStateUseCase::new(world.clone())),
        });

        Self {
            state,
            world,
            teardown,
            bind_addr: config.bind_addr(),
        }
    }

    fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/matches", get(get_matches))
            .route("/debug/lobby", get(debug_lobby_state))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind to the configured `host:port` and serve until Ctrl+C
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.bind_addr).await?;

        tracing::info!("Match lobby server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", self.bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Session exit grace is {:?}", self.teardown.exit_grace());
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        // 予約中の破棄を止めてから全状態を破棄する
        self.teardown.shutdown().await;
        self.world.lock().await.shutdown();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
