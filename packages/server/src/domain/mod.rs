//! ドメイン層
//!
//! ロビー（マッチレジストリ）と対局セッションの状態遷移を、I/O から切り離した
//! 同期的なモデルとして定義します。送信やエンティティ生成は `Effect` として返し、
//! 実行は UseCase 層に任せます。

pub mod board;
pub mod disconnect;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod operation;
pub mod player_spawner;
pub mod value_object;

pub use board::{Cell, CellMask};
pub use disconnect::DisconnectSubscribers;
pub use entity::{
    GameOutcome, GameSession, GameWorld, MAX_PLAYERS, MatchInfo, MatchRegistry, MoveOutcome,
    PlayerInfo, RegisteredPlayer, Seat, SessionPhase, SessionPlayerData, SessionSummary,
    WorldSnapshot,
};
pub use error::{MessagePushError, ValueObjectError};
pub use event::{Effect, Outbox, PlayerScore, ServerEvent};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use operation::{ClientMatchOperation, ServerMatchOperation};
pub use player_spawner::PlayerSpawner;
pub use value_object::{
    CONNECTION_ID_MAX_LEN, ConnectionId, ConnectionIdFactory, MatchId, PlayerIndex, Timestamp,
};
