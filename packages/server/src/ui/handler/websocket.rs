//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{Cell, ConnectionId, ConnectionIdFactory, MatchId},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::ConnectError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards pushed messages from the rx channel to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // The transport owns connection identity: every upgraded socket gets a fresh id
    let connection_id = ConnectionIdFactory::generate();

    // Create a channel for this connection to receive pushed messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Register only once the upgrade has completed
    match state
        .connect_player_usecase
        .execute(connection_id.clone(), tx)
        .await
    {
        Ok(_connected_at) => tracing::info!("Connection '{}' accepted", connection_id),
        Err(ConnectError::DuplicateConnection(id)) => {
            tracing::warn!("Connection '{}' is already registered, closing", id);
            return;
        }
    }

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_client_message(&state_clone, &connection_id_clone, text.as_str()).await;
                }
                Message::Binary(_) => {
                    tracing::warn!(
                        "Dropping binary frame from '{}': only JSON text frames are accepted",
                        connection_id_clone
                    );
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to push server messages to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state
        .disconnect_player_usecase
        .execute(&connection_id)
        .await
    {
        Ok(()) => tracing::info!("Connection '{}' disconnected", connection_id),
        Err(e) => tracing::warn!("Failed to disconnect '{}': {}", connection_id, e),
    }
}

/// Parse one client frame and route it to the matching use case
async fn handle_client_message(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Malformed message from '{}': {}", connection_id, e);
            return;
        }
    };
    tracing::debug!("Received {:?} from '{}'", message, connection_id);

    match message {
        ClientMessage::Match {
            operation,
            match_id,
        } => {
            let match_id = match match_id.as_deref().map(MatchId::try_from).transpose() {
                Ok(match_id) => match_id,
                Err(e) => {
                    tracing::warn!("Invalid match id from '{}': {}", connection_id, e);
                    return;
                }
            };
            state
                .match_operation_usecase
                .execute(connection_id, operation, match_id)
                .await;
        }
        ClientMessage::MakeMove { cell } => match Cell::try_from(cell.as_str()) {
            Ok(cell) => state.make_move_usecase.execute(connection_id, cell).await,
            Err(e) => tracing::warn!("Invalid cell from '{}': {}", connection_id, e),
        },
        ClientMessage::RequestRematch => {
            state.request_rematch_usecase.execute(connection_id).await;
        }
        ClientMessage::RequestExit => {
            state.exit_session_usecase.execute(connection_id).await;
        }
    }
}
