//! ロビー操作のオペレーションコード
//!
//! どちらも 1 バイトの列挙型で、ワイヤ上では snake_case 文字列、
//! 内部では `u8` コードとして扱えます。

use serde::{Deserialize, Serialize};

/// クライアントからサーバーへ要求するロビー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ServerMatchOperation {
    None = 0,
    Create = 1,
    Cancel = 2,
    Start = 3,
    Join = 4,
    Leave = 5,
    Ready = 6,
}

/// サーバーからクライアントへ通知するロビー操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ClientMatchOperation {
    None = 0,
    List = 1,
    Created = 2,
    Cancelled = 3,
    Joined = 4,
    Departed = 5,
    UpdateRoom = 6,
    Started = 7,
}
