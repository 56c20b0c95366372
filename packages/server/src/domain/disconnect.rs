//! 切断通知の購読者リスト
//!
//! マッチ開始時にセッションが購読し、終了シーケンスの開始時に購読を解除します。
//! 接続が切れると購読中のセッションにだけ通知されます。

use super::MatchId;

#[derive(Debug, Default, Clone)]
pub struct DisconnectSubscribers {
    sessions: Vec<MatchId>,
}

impl DisconnectSubscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 購読を追加（重複は無視）
    pub fn subscribe(&mut self, match_id: MatchId) {
        if !self.sessions.contains(&match_id) {
            self.sessions.push(match_id);
        }
    }

    /// 購読を解除（未購読なら何もしない）
    pub fn unsubscribe(&mut self, match_id: &MatchId) {
        self.sessions.retain(|id| id != match_id);
    }

    pub fn is_subscribed(&self, match_id: &MatchId) -> bool {
        self.sessions.contains(match_id)
    }

    /// 通知対象のスナップショット（通知中の購読解除に備えて複製を返す）
    pub fn snapshot(&self) -> Vec<MatchId> {
        self.sessions.clone()
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_is_idempotent() {
        // given (前提条件):
        let mut subscribers = DisconnectSubscribers::new();
        let id = MatchId::generate();

        // when (操作):
        subscribers.subscribe(id);
        subscribers.subscribe(id);

        // then (期待する結果):
        assert_eq!(subscribers.snapshot(), vec![id]);
    }

    #[test]
    fn test_unsubscribe_removes_only_target() {
        // テスト項目: 購読解除は対象のセッションだけを外し、二重解除しても他に影響しない
        let mut subscribers = DisconnectSubscribers::new();
        let id = MatchId::generate();
        let other = MatchId::generate();
        subscribers.subscribe(id);
        subscribers.subscribe(other);

        subscribers.unsubscribe(&id);
        subscribers.unsubscribe(&id);

        assert!(!subscribers.is_subscribed(&id));
        assert_eq!(subscribers.snapshot(), vec![other]);
    }
}
