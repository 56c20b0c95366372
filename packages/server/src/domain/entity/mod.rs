//! ドメインエンティティ

mod registry;
mod session;
mod world;

pub use registry::{MAX_PLAYERS, MatchInfo, MatchRegistry, PlayerInfo, RegisteredPlayer};
pub use session::{GameOutcome, GameSession, MoveOutcome, Seat, SessionPhase, SessionPlayerData};
pub use world::{GameWorld, SessionSummary, WorldSnapshot};
