//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectPlayerUseCase, DisconnectPlayerUseCase, ExitSessionUseCase, GetLobbyStateUseCase,
    MakeMoveUseCase, MatchOperationUseCase, RequestRematchUseCase,
};

pub struct AppState {
    pub connect_player_usecase: Arc<ConnectPlayerUseCase>,
    pub disconnect_player_usecase: Arc<DisconnectPlayerUseCase>,
    pub match_operation_usecase: Arc<MatchOperationUseCase>,
    pub make_move_usecase: Arc<MakeMoveUseCase>,
    pub request_rematch_usecase: Arc<RequestRematchUseCase>,
    pub exit_session_usecase: Arc<ExitSessionUseCase>,
    pub get_lobby_state_usecase: Arc<GetLobbyStateUseCase>,
}
