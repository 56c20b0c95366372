//! サーバーが発行するイベントと副作用
//!
//! ドメインモデルは状態遷移の結果を `Effect` の列として返し、
//! 実際の送信やエンティティ生成は UseCase 層が実行します。

use super::{
    Cell, ClientMatchOperation, ConnectionId, MatchId, PlayerIndex,
    entity::{MatchInfo, PlayerInfo},
};

/// セッション内プレイヤーの勝利数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerScore {
    pub player_index: PlayerIndex,
    pub wins: u32,
}

/// クライアントへ通知するイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// 接続直後に自分のプレイヤー番号を通知
    Connected { player_index: PlayerIndex },
    MatchList { matches: Vec<MatchInfo> },
    Created {
        match_id: MatchId,
        players: Vec<PlayerInfo>,
    },
    Cancelled,
    Joined {
        match_id: MatchId,
        players: Vec<PlayerInfo>,
    },
    Departed,
    UpdateRoom { players: Vec<PlayerInfo> },
    Started,
    CellClaimed {
        cell: Cell,
        player_index: PlayerIndex,
    },
    GameWon { winner: PlayerIndex },
    GameDraw,
    GameRestarted,
    TurnChanged { player_index: PlayerIndex },
    ScoresUpdated { players: Vec<PlayerScore> },
    MatchEnded,
}

impl ServerEvent {
    /// ロビーイベントのオペレーションコード（セッションイベントは `None`）
    pub fn lobby_operation(&self) -> Option<ClientMatchOperation> {
        match self {
            ServerEvent::MatchList { .. } => Some(ClientMatchOperation::List),
            ServerEvent::Created { .. } => Some(ClientMatchOperation::Created),
            ServerEvent::Cancelled => Some(ClientMatchOperation::Cancelled),
            ServerEvent::Joined { .. } => Some(ClientMatchOperation::Joined),
            ServerEvent::Departed => Some(ClientMatchOperation::Departed),
            ServerEvent::UpdateRoom { .. } => Some(ClientMatchOperation::UpdateRoom),
            ServerEvent::Started => Some(ClientMatchOperation::Started),
            _ => None,
        }
    }
}

/// ドメイン操作が要求する副作用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// 単一の接続へイベントを送信
    Send {
        to: ConnectionId,
        event: ServerEvent,
    },
    /// 接続にマッチ所属のプレイヤーエンティティを生成
    SpawnPlayer {
        connection: ConnectionId,
        match_id: MatchId,
    },
    /// 接続のプレイヤーエンティティを破棄
    DespawnPlayer { connection: ConnectionId },
    /// 猶予時間の経過後にセッションを破棄する
    ScheduleTeardown { match_id: MatchId },
}

/// 副作用を順序どおりに積むバッファ
#[derive(Debug, Default)]
pub struct Outbox {
    effects: Vec<Effect>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, to: &ConnectionId, event: ServerEvent) {
        self.effects.push(Effect::Send {
            to: to.clone(),
            event,
        });
    }

    /// 複数の接続へ同じイベントを送信
    pub fn broadcast<'a>(
        &mut self,
        targets: impl IntoIterator<Item = &'a ConnectionId>,
        event: ServerEvent,
    ) {
        for target in targets {
            self.send(target, event.clone());
        }
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}
