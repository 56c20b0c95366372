//! 3x3 盤面のビットマスク表現
//!
//! ```text
//!     A1 | B1 | C1
//!     ---+----+---
//!     A2 | B2 | C2
//!     ---+----+---
//!     A3 | B3 | C3
//! ```
//!
//! 各セルは 9-bit フィールドの 1 ビットに対応します。勝利判定は 8 本の
//! ラインマスクに対する包含判定（`mask & line == line`）です。

use std::{fmt, ops::BitOr};

use serde::Serialize;

use super::ValueObjectError;

/// 盤面上のセル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Cell {
    A1,
    B1,
    C1,
    A2,
    B2,
    C2,
    A3,
    B3,
    C3,
}

impl Cell {
    /// 全セル（ビット順）
    pub const ALL: [Cell; 9] = [
        Cell::A1,
        Cell::B1,
        Cell::C1,
        Cell::A2,
        Cell::B2,
        Cell::C2,
        Cell::A3,
        Cell::B3,
        Cell::C3,
    ];

    /// このセルだけが立ったマスク
    pub const fn mask(self) -> CellMask {
        CellMask(1 << self as u16)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Cell::A1 => "A1",
            Cell::B1 => "B1",
            Cell::C1 => "C1",
            Cell::A2 => "A2",
            Cell::B2 => "B2",
            Cell::C2 => "C2",
            Cell::A3 => "A3",
            Cell::B3 => "B3",
            Cell::C3 => "C3",
        }
    }
}

impl TryFrom<&str> for Cell {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Cell::ALL
            .into_iter()
            .find(|cell| cell.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ValueObjectError::InvalidCell(value.to_string()))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// セル集合のビットマスク
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CellMask(u16);

impl CellMask {
    pub const EMPTY: CellMask = CellMask(0);

    pub const TOP_ROW: CellMask = Cell::A1.mask().union(Cell::B1.mask()).union(Cell::C1.mask());
    pub const MID_ROW: CellMask = Cell::A2.mask().union(Cell::B2.mask()).union(Cell::C2.mask());
    pub const BOT_ROW: CellMask = Cell::A3.mask().union(Cell::B3.mask()).union(Cell::C3.mask());
    pub const LEFT_COL: CellMask = Cell::A1.mask().union(Cell::A2.mask()).union(Cell::A3.mask());
    pub const MID_COL: CellMask = Cell::B1.mask().union(Cell::B2.mask()).union(Cell::B3.mask());
    pub const RIGHT_COL: CellMask = Cell::C1.mask().union(Cell::C2.mask()).union(Cell::C3.mask());
    pub const DIAG_1: CellMask = Cell::A1.mask().union(Cell::B2.mask()).union(Cell::C3.mask());
    pub const DIAG_2: CellMask = Cell::A3.mask().union(Cell::B2.mask()).union(Cell::C1.mask());

    /// 盤面が埋まった状態
    pub const FULL: CellMask = Self::TOP_ROW.union(Self::MID_ROW).union(Self::BOT_ROW);

    /// 勝利ライン（行 3 本、列 3 本、対角 2 本）
    pub const LINES: [CellMask; 8] = [
        Self::TOP_ROW,
        Self::MID_ROW,
        Self::BOT_ROW,
        Self::LEFT_COL,
        Self::MID_COL,
        Self::RIGHT_COL,
        Self::DIAG_1,
        Self::DIAG_2,
    ];

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn union(self, other: CellMask) -> CellMask {
        CellMask(self.0 | other.0)
    }

    /// `other` の全ビットを含むか
    pub const fn contains(self, other: CellMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn has(self, cell: Cell) -> bool {
        self.contains(cell.mask())
    }

    pub fn insert(&mut self, cell: Cell) {
        self.0 |= cell.mask().0;
    }

    pub const fn is_full(self) -> bool {
        self.0 == Self::FULL.0
    }

    /// いずれかの勝利ラインを完成させているか
    pub fn completes_line(self) -> bool {
        Self::LINES.iter().any(|line| self.contains(*line))
    }

    pub fn cells(self) -> impl Iterator<Item = Cell> {
        Cell::ALL.into_iter().filter(move |cell| self.has(*cell))
    }
}

impl BitOr<Cell> for CellMask {
    type Output = CellMask;

    fn bitor(self, rhs: Cell) -> CellMask {
        self.union(rhs.mask())
    }
}

impl FromIterator<Cell> for CellMask {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        iter.into_iter().fold(CellMask::EMPTY, |mask, cell| mask | cell)
    }
}
