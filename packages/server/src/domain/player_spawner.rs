//! PlayerSpawner trait 定義
//!
//! トランスポート層が持つ「接続に紐づくプレイヤーエンティティ」の生成・破棄。
//! エンティティはマッチ ID による所有権の分割にのみ使われ、
//! ロビーやセッションのロジックはその中身に依存しません。

use async_trait::async_trait;

use super::{ConnectionId, MatchId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerSpawner: Send + Sync {
    /// 接続にマッチ所属のプレイヤーエンティティを生成
    async fn spawn_player(&self, connection_id: &ConnectionId, match_id: MatchId);

    /// 接続のプレイヤーエンティティを破棄（存在しなければ何もしない）
    async fn despawn_player(&self, connection_id: &ConnectionId);
}
