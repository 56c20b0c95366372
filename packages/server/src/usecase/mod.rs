//! UseCase 層
//!
//! 接続ごとのインバウンド操作を受け、`GameWorld` をロックして状態遷移を実行し、
//! 返された `Effect` をトランスポートへ反映します。
//! ワールドのロックを保持したまま副作用を実行するため、操作は到着順に逐次処理されます。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::GameWorld;

pub mod connect_player;
pub mod disconnect_player;
pub mod dispatcher;
pub mod error;
pub mod exit_session;
pub mod get_lobby_state;
pub mod make_move;
pub mod match_operation;
pub mod request_rematch;
pub mod teardown;

#[cfg(test)]
pub(crate) mod test_support;

/// UseCase 間で共有されるサーバー権威の状態
pub type SharedWorld = Arc<Mutex<GameWorld>>;

pub use connect_player::ConnectPlayerUseCase;
pub use disconnect_player::DisconnectPlayerUseCase;
pub use dispatcher::EffectDispatcher;
pub use error::{ConnectError, DisconnectError};
pub use exit_session::ExitSessionUseCase;
pub use get_lobby_state::GetLobbyStateUseCase;
pub use make_move::MakeMoveUseCase;
pub use match_operation::MatchOperationUseCase;
pub use request_rematch::RequestRematchUseCase;
pub use teardown::SessionTeardownScheduler;
