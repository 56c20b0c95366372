//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの生成時エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// ConnectionId が空
    #[error("connection id must not be empty")]
    ConnectionIdEmpty,

    /// ConnectionId が長すぎる
    #[error("connection id exceeds {max} characters (got {actual})")]
    ConnectionIdTooLong { max: usize, actual: usize },

    /// MatchId が UUID として解釈できない
    #[error("invalid match id: '{0}'")]
    InvalidMatchId(String),

    /// セル名が A1..C3 以外
    #[error("invalid cell: '{0}'")]
    InvalidCell(String),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先のクライアントが登録されていない
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// チャンネルへの送信に失敗
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
