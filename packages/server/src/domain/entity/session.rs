//! 対局セッション
//!
//! 開始されたマッチごとに 1 つ存在し、盤面・手番・勝敗判定・再戦・退出を管理します。
//!
//! ```text
//! AwaitingPlayers → InProgress → Concluded(Won | Draw)
//!                       ↑              │
//!                       └── rematch ───┤
//!                                      └→ Exiting → (破棄)
//! ```

use serde::Serialize;

use crate::domain::{
    Cell, CellMask, ConnectionId, MatchId, Outbox, PlayerIndex, PlayerScore, ServerEvent,
};

/// セッション内の席
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Seat {
    Player1,
    Player2,
}

impl Seat {
    pub fn other(self) -> Self {
        match self {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        }
    }
}

/// 対局の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOutcome {
    Won(Seat),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    AwaitingPlayers,
    InProgress,
    Concluded(GameOutcome),
    Exiting,
}

/// `make_move` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// 手番でない、または既に埋まったセル（状態は変わらない）
    Rejected,
    /// 受理され、手番が相手に移った
    Accepted,
    Won,
    Draw,
}

/// プレイヤーごとのセッションデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionPlayerData {
    pub connection_id: ConnectionId,
    pub player_index: PlayerIndex,
    /// 再戦をまたいで保持される勝利数
    pub wins: u32,
    /// 今回の対局で取ったセル
    pub current_score: CellMask,
}

impl SessionPlayerData {
    pub fn new(connection_id: ConnectionId, player_index: PlayerIndex) -> Self {
        Self {
            connection_id,
            player_index,
            wins: 0,
            current_score: CellMask::EMPTY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    match_id: MatchId,
    player1: SessionPlayerData,
    player2: SessionPlayerData,
    /// 両者の取ったセルの合計
    board: CellMask,
    starting: Seat,
    current: Option<Seat>,
    rematch_requested_by: Option<Seat>,
    phase: SessionPhase,
}

impl GameSession {
    pub fn new(match_id: MatchId, player1: SessionPlayerData, player2: SessionPlayerData) -> Self {
        Self {
            match_id,
            player1,
            player2,
            board: CellMask::EMPTY,
            starting: Seat::Player1,
            current: None,
            rematch_requested_by: None,
            phase: SessionPhase::AwaitingPlayers,
        }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn board(&self) -> CellMask {
        self.board
    }

    pub fn current_seat(&self) -> Option<Seat> {
        self.current
    }

    /// 手番のプレイヤーの接続
    pub fn turn_holder(&self) -> Option<&ConnectionId> {
        self.current.map(|seat| &self.player(seat).connection_id)
    }

    pub fn player(&self, seat: Seat) -> &SessionPlayerData {
        match seat {
            Seat::Player1 => &self.player1,
            Seat::Player2 => &self.player2,
        }
    }

    fn player_mut(&mut self, seat: Seat) -> &mut SessionPlayerData {
        match seat {
            Seat::Player1 => &mut self.player1,
            Seat::Player2 => &mut self.player2,
        }
    }

    pub fn seat_of(&self, connection_id: &ConnectionId) -> Option<Seat> {
        if &self.player1.connection_id == connection_id {
            Some(Seat::Player1)
        } else if &self.player2.connection_id == connection_id {
            Some(Seat::Player2)
        } else {
            None
        }
    }

    pub fn participants(&self) -> [&ConnectionId; 2] {
        [&self.player1.connection_id, &self.player2.connection_id]
    }

    /// セルの所有者
    pub fn owner_of(&self, cell: Cell) -> Option<Seat> {
        [Seat::Player1, Seat::Player2]
            .into_iter()
            .find(|seat| self.player(*seat).current_score.has(cell))
    }

    fn scores(&self) -> Vec<PlayerScore> {
        [&self.player1, &self.player2]
            .into_iter()
            .map(|p| PlayerScore {
                player_index: p.player_index,
                wins: p.wins,
            })
            .collect()
    }

    fn broadcast(&self, out: &mut Outbox, event: ServerEvent) {
        out.broadcast(self.participants(), event);
    }

    fn announce_turn(&self, out: &mut Outbox) {
        if let Some(seat) = self.current {
            self.broadcast(
                out,
                ServerEvent::TurnChanged {
                    player_index: self.player(seat).player_index,
                },
            );
        }
    }

    /// 両プレイヤーが揃ったので対局を開始（先手は player1）
    pub fn begin(&mut self, out: &mut Outbox) {
        if self.phase != SessionPhase::AwaitingPlayers {
            return;
        }
        self.starting = Seat::Player1;
        self.current = Some(self.starting);
        self.phase = SessionPhase::InProgress;

        self.broadcast(
            out,
            ServerEvent::ScoresUpdated {
                players: self.scores(),
            },
        );
        self.announce_turn(out);
    }

    /// 手を打つ
    pub fn make_move(
        &mut self,
        connection_id: &ConnectionId,
        cell: Cell,
        out: &mut Outbox,
    ) -> MoveOutcome {
        let Some(seat) = self.current else {
            return MoveOutcome::Rejected;
        };
        if self.phase != SessionPhase::InProgress
            || &self.player(seat).connection_id != connection_id
            || self.board.has(cell)
        {
            return MoveOutcome::Rejected;
        }

        let player_index = self.player(seat).player_index;
        self.board.insert(cell);
        self.player_mut(seat).current_score.insert(cell);
        self.broadcast(out, ServerEvent::CellClaimed { cell, player_index });

        if self.player(seat).current_score.completes_line() {
            self.player_mut(seat).wins += 1;
            self.current = None;
            self.phase = SessionPhase::Concluded(GameOutcome::Won(seat));
            self.broadcast(
                out,
                ServerEvent::GameWon {
                    winner: player_index,
                },
            );
            self.broadcast(
                out,
                ServerEvent::ScoresUpdated {
                    players: self.scores(),
                },
            );
            MoveOutcome::Won
        } else if self.board.is_full() {
            self.current = None;
            self.phase = SessionPhase::Concluded(GameOutcome::Draw);
            self.broadcast(out, ServerEvent::GameDraw);
            MoveOutcome::Draw
        } else {
            self.current = Some(seat.other());
            self.announce_turn(out);
            MoveOutcome::Accepted
        }
    }

    /// 再戦要求（両者の要求が揃ったら盤面を初期化して先手を交代）
    ///
    /// 盤面を初期化した場合は `true` を返します。
    pub fn request_rematch(&mut self, connection_id: &ConnectionId, out: &mut Outbox) -> bool {
        let Some(seat) = self.seat_of(connection_id) else {
            return false;
        };
        if !matches!(self.phase, SessionPhase::Concluded(_)) {
            return false;
        }

        match self.rematch_requested_by {
            None => {
                self.rematch_requested_by = Some(seat);
                false
            }
            Some(requested) if requested == seat => false,
            Some(_) => {
                self.restart(out);
                true
            }
        }
    }

    fn restart(&mut self, out: &mut Outbox) {
        self.rematch_requested_by = None;
        self.board = CellMask::EMPTY;
        self.player1.current_score = CellMask::EMPTY;
        self.player2.current_score = CellMask::EMPTY;
        self.broadcast(out, ServerEvent::GameRestarted);

        self.starting = self.starting.other();
        self.current = Some(self.starting);
        self.phase = SessionPhase::InProgress;
        self.announce_turn(out);
    }

    /// 終了シーケンスを開始
    ///
    /// `match_ended` を参加者へ送信し（切断済みの `disconnected` は除く）、以降の手を受け付けません。
    /// 既に終了シーケンス中なら `false` を返します。
    pub fn begin_exit(&mut self, disconnected: Option<&ConnectionId>, out: &mut Outbox) -> bool {
        if self.phase == SessionPhase::Exiting {
            return false;
        }
        self.phase = SessionPhase::Exiting;
        self.current = None;
        self.rematch_requested_by = None;

        let recipients = self
            .participants()
            .into_iter()
            .filter(|conn| Some(*conn) != disconnected);
        out.broadcast(recipients, ServerEvent::MatchEnded);
        true
    }
}
