//! マッチレジストリ（ロビー）
//!
//! 公開中のマッチ、接続ごとのプレイヤー情報、マッチの所属、待機中の接続を管理します。
//! 全ての操作はサーバー権威で、前提条件を満たさない要求は何もせずに無視します。
//!
//! ## 不変条件
//!
//! - 1 つの接続が所属するマッチは高々 1 つ
//! - マッチの所属人数は `MAX_PLAYERS` 以下
//! - 待機プールの接続はどのマッチにも所属していない

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{ConnectionId, MatchId, Outbox, PlayerIndex, ServerEvent, Timestamp};

/// 1 マッチの最大人数
pub const MAX_PLAYERS: u8 = 2;

/// 接続ごとのプレイヤー情報
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerInfo {
    pub player_index: PlayerIndex,
    pub ready: bool,
    pub match_id: Option<MatchId>,
}

/// 公開中のマッチ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchInfo {
    pub match_id: MatchId,
    pub players: u8,
    pub max_players: u8,
}

impl MatchInfo {
    fn new(match_id: MatchId) -> Self {
        Self {
            match_id,
            players: 1,
            max_players: MAX_PLAYERS,
        }
    }

    pub fn is_full(&self) -> bool {
        self.players >= self.max_players
    }
}

/// 接続中のプレイヤー（デバッグ表示用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredPlayer {
    pub connection_id: ConnectionId,
    pub info: PlayerInfo,
    pub connected_at: Timestamp,
}

#[derive(Debug, Clone)]
struct PlayerEntry {
    info: PlayerInfo,
    connected_at: Timestamp,
}

/// ロビーの状態
#[derive(Debug, Clone)]
pub struct MatchRegistry {
    next_player_index: PlayerIndex,
    players: HashMap<ConnectionId, PlayerEntry>,
    /// マッチを作成した接続 → マッチ
    owned_matches: HashMap<ConnectionId, MatchId>,
    /// 公開中のマッチ（作成順）
    open_matches: Vec<MatchInfo>,
    /// マッチごとの所属接続（参加順）
    memberships: HashMap<MatchId, Vec<ConnectionId>>,
    /// マッチにもセッションにも属していない接続（接続順）
    waiting: Vec<ConnectionId>,
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self {
            next_player_index: PlayerIndex::FIRST,
            players: HashMap::new(),
            owned_matches: HashMap::new(),
            open_matches: Vec::new(),
            memberships: HashMap::new(),
            waiting: Vec::new(),
        }
    }

    /// 全テーブルを破棄し、プレイヤー番号を初期化
    pub fn shutdown(&mut self) {
        *self = Self::new();
    }

    // ========================================
    // 参照
    // ========================================

    pub fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.players.contains_key(connection_id)
    }

    pub fn player_info(&self, connection_id: &ConnectionId) -> Option<PlayerInfo> {
        self.players.get(connection_id).map(|entry| entry.info)
    }

    pub fn open_matches(&self) -> Vec<MatchInfo> {
        self.open_matches.clone()
    }

    pub fn open_match(&self, match_id: &MatchId) -> Option<MatchInfo> {
        self.open_matches
            .iter()
            .find(|info| &info.match_id == match_id)
            .copied()
    }

    pub fn members(&self, match_id: &MatchId) -> &[ConnectionId] {
        self.memberships
            .get(match_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn waiting(&self) -> &[ConnectionId] {
        &self.waiting
    }

    pub fn owned_match(&self, connection_id: &ConnectionId) -> Option<MatchId> {
        self.owned_matches.get(connection_id).copied()
    }

    /// 接続中の全プレイヤー（プレイヤー番号順）
    pub fn registered_players(&self) -> Vec<RegisteredPlayer> {
        let mut players: Vec<RegisteredPlayer> = self
            .players
            .iter()
            .map(|(connection_id, entry)| RegisteredPlayer {
                connection_id: connection_id.clone(),
                info: entry.info,
                connected_at: entry.connected_at,
            })
            .collect();
        players.sort_by_key(|p| p.info.player_index);
        players
    }

    /// マッチ所属者の PlayerInfo（参加順）
    pub fn player_infos(&self, match_id: &MatchId) -> Vec<PlayerInfo> {
        self.members(match_id)
            .iter()
            .filter_map(|conn| self.player_info(conn))
            .collect()
    }

    fn is_member_of_any(&self, connection_id: &ConnectionId) -> bool {
        self.memberships
            .values()
            .any(|members| members.contains(connection_id))
    }

    // ========================================
    // 接続ライフサイクル
    // ========================================

    /// 接続の準備完了：待機プールに追加し、番号を払い出して一覧を送信
    pub fn connection_ready(
        &mut self,
        connection_id: &ConnectionId,
        connected_at: Timestamp,
        out: &mut Outbox,
    ) -> PlayerInfo {
        if let Some(info) = self.player_info(connection_id) {
            tracing::debug!("Connection '{}' is already registered", connection_id);
            return info;
        }

        let info = PlayerInfo {
            player_index: self.next_player_index,
            ready: false,
            match_id: None,
        };
        self.next_player_index = self.next_player_index.next();
        self.players.insert(
            connection_id.clone(),
            PlayerEntry { info, connected_at },
        );
        self.add_waiting(connection_id);

        out.send(
            connection_id,
            ServerEvent::Connected {
                player_index: info.player_index,
            },
        );
        self.broadcast_match_list(Some(connection_id), out);
        info
    }

    /// 接続の切断：所有マッチの解体、所属の除去、人数の更新
    pub fn connection_lost(&mut self, connection_id: &ConnectionId, out: &mut Outbox) {
        if let Some(match_id) = self.owned_matches.remove(connection_id) {
            self.remove_open_match(&match_id);
            let members = self.memberships.remove(&match_id).unwrap_or_default();
            for member in members.iter().filter(|m| *m != connection_id) {
                self.reset_to_waiting(member);
                out.send(member, ServerEvent::Departed);
            }
            tracing::info!(
                "Match {} torn down because owner '{}' disconnected",
                match_id,
                connection_id
            );
        }

        for members in self.memberships.values_mut() {
            members.retain(|m| m != connection_id);
        }

        if let Some(match_id) = self.player_info(connection_id).and_then(|i| i.match_id) {
            if let Some(info) = self.open_match_mut(&match_id) {
                info.players = info.players.saturating_sub(1);
            }
            if self.memberships.contains_key(&match_id) {
                let infos = self.player_infos(&match_id);
                out.broadcast(
                    self.members(&match_id),
                    ServerEvent::UpdateRoom { players: infos },
                );
            }
        }

        self.players.remove(connection_id);
        self.waiting.retain(|w| w != connection_id);
        self.broadcast_match_list(None, out);
    }

    // ========================================
    // ロビー操作
    // ========================================

    /// マッチを作成。既にマッチに所属していれば何もしない
    pub fn create_match(
        &mut self,
        connection_id: &ConnectionId,
        out: &mut Outbox,
    ) -> Option<MatchId> {
        let info = self.player_info(connection_id)?;
        if info.match_id.is_some() || self.owned_matches.contains_key(connection_id) {
            tracing::debug!(
                "Ignoring create from '{}': already in a match",
                connection_id
            );
            return None;
        }

        let match_id = MatchId::generate();
        self.memberships
            .insert(match_id, vec![connection_id.clone()]);
        self.owned_matches.insert(connection_id.clone(), match_id);
        self.open_matches.push(MatchInfo::new(match_id));
        self.update_player(connection_id, |info| {
            info.ready = false;
            info.match_id = Some(match_id);
        });
        self.waiting.retain(|w| w != connection_id);

        out.send(
            connection_id,
            ServerEvent::Created {
                match_id,
                players: self.player_infos(&match_id),
            },
        );
        self.broadcast_match_list(None, out);
        tracing::info!("Match {} created by '{}'", match_id, connection_id);
        Some(match_id)
    }

    /// 所有マッチを取り消し。所有していなければ何もしない
    pub fn cancel_match(&mut self, connection_id: &ConnectionId, out: &mut Outbox) {
        let Some(match_id) = self.owned_matches.remove(connection_id) else {
            tracing::debug!("Ignoring cancel from '{}': owns no match", connection_id);
            return;
        };

        out.send(connection_id, ServerEvent::Cancelled);
        self.remove_open_match(&match_id);
        let members = self.memberships.remove(&match_id).unwrap_or_default();
        for member in &members {
            self.reset_to_waiting(member);
            out.send(member, ServerEvent::Departed);
        }
        self.broadcast_match_list(None, out);
        tracing::info!("Match {} cancelled by '{}'", match_id, connection_id);
    }

    /// マッチに参加。未知・満員のマッチ、または既に所属中なら何もしない
    pub fn join_match(&mut self, connection_id: &ConnectionId, match_id: MatchId, out: &mut Outbox) {
        let Some(info) = self.player_info(connection_id) else {
            return;
        };
        if info.match_id.is_some() || self.is_member_of_any(connection_id) {
            tracing::debug!("Ignoring join from '{}': already in a match", connection_id);
            return;
        }
        if !self.memberships.contains_key(&match_id) {
            tracing::debug!("Ignoring join from '{}': unknown match {}", connection_id, match_id);
            return;
        }
        let Some(open) = self.open_match_mut(&match_id) else {
            return;
        };
        if open.is_full() {
            tracing::debug!("Ignoring join from '{}': match {} is full", connection_id, match_id);
            return;
        }
        open.players += 1;

        if let Some(members) = self.memberships.get_mut(&match_id) {
            members.push(connection_id.clone());
        }
        self.update_player(connection_id, |info| {
            info.ready = false;
            info.match_id = Some(match_id);
        });
        self.waiting.retain(|w| w != connection_id);

        let infos = self.player_infos(&match_id);
        out.send(
            connection_id,
            ServerEvent::Joined {
                match_id,
                players: infos.clone(),
            },
        );
        out.broadcast(
            self.members(&match_id),
            ServerEvent::UpdateRoom { players: infos },
        );
        self.broadcast_match_list(None, out);
        tracing::info!("'{}' joined match {}", connection_id, match_id);
    }

    /// マッチから離脱。所有者の離脱は取り消しとして扱う
    pub fn leave_match(
        &mut self,
        connection_id: &ConnectionId,
        match_id: MatchId,
        out: &mut Outbox,
    ) {
        if self.owned_matches.get(connection_id) == Some(&match_id) {
            self.cancel_match(connection_id, out);
            return;
        }
        if self.open_match(&match_id).is_none() || !self.members(&match_id).contains(connection_id)
        {
            tracing::debug!(
                "Ignoring leave from '{}': not a member of open match {}",
                connection_id,
                match_id
            );
            return;
        }

        if let Some(open) = self.open_match_mut(&match_id) {
            open.players = open.players.saturating_sub(1);
        }
        for members in self.memberships.values_mut() {
            members.retain(|m| m != connection_id);
        }
        self.reset_to_waiting(connection_id);

        if self.members(&match_id).is_empty() {
            self.memberships.remove(&match_id);
            self.remove_open_match(&match_id);
        } else {
            let infos = self.player_infos(&match_id);
            out.broadcast(
                self.members(&match_id),
                ServerEvent::UpdateRoom { players: infos },
            );
        }
        out.send(connection_id, ServerEvent::Departed);
        self.broadcast_match_list(None, out);
        tracing::info!("'{}' left match {}", connection_id, match_id);
    }

    /// 準備状態を反転し、所属者全員に通知
    pub fn toggle_ready(
        &mut self,
        connection_id: &ConnectionId,
        match_id: MatchId,
        out: &mut Outbox,
    ) {
        if !self.members(&match_id).contains(connection_id) {
            tracing::debug!(
                "Ignoring ready toggle from '{}': not a member of {}",
                connection_id,
                match_id
            );
            return;
        }
        self.update_player(connection_id, |info| info.ready = !info.ready);

        let infos = self.player_infos(&match_id);
        out.broadcast(
            self.members(&match_id),
            ServerEvent::UpdateRoom { players: infos },
        );
    }

    /// 開始可能な所有マッチをロビーから取り出す
    ///
    /// 満員かつ全員準備完了のときだけ、所属者に `Started` を送り、
    /// マッチの登録（所有・公開・所属）を全て解除して参加順の 2 接続を返します。
    pub fn take_startable_match(
        &mut self,
        connection_id: &ConnectionId,
        out: &mut Outbox,
    ) -> Option<(MatchId, [ConnectionId; 2])> {
        let match_id = self.owned_match(connection_id)?;
        let members = self.members(&match_id).to_vec();
        let [first, second] = members.as_slice() else {
            tracing::debug!(
                "Ignoring start of {}: needs {} players, has {}",
                match_id,
                MAX_PLAYERS,
                members.len()
            );
            return None;
        };
        let everyone_ready = members
            .iter()
            .all(|m| self.player_info(m).is_some_and(|info| info.ready));
        if !everyone_ready {
            tracing::debug!("Ignoring start of {}: not everyone is ready", match_id);
            return None;
        }

        for member in &members {
            out.send(member, ServerEvent::Started);
            self.update_player(member, |info| info.ready = false);
        }
        self.owned_matches.remove(connection_id);
        self.remove_open_match(&match_id);
        self.memberships.remove(&match_id);
        self.broadcast_match_list(None, out);

        Some((match_id, [first.clone(), second.clone()]))
    }

    /// セッションを終えた接続を待機プールに戻す
    pub fn return_to_waiting(&mut self, connection_id: &ConnectionId) {
        if self.is_connected(connection_id) {
            self.reset_to_waiting(connection_id);
        }
    }

    /// 公開マッチ一覧を送信（`target` 指定時はその接続だけ、なければ待機中の全接続）
    pub fn broadcast_match_list(&self, target: Option<&ConnectionId>, out: &mut Outbox) {
        let event = ServerEvent::MatchList {
            matches: self.open_matches(),
        };
        match target {
            Some(conn) => out.send(conn, event),
            None => out.broadcast(&self.waiting, event),
        }
    }

    // ========================================
    // 内部ヘルパー
    // ========================================

    fn update_player(&mut self, connection_id: &ConnectionId, f: impl FnOnce(&mut PlayerInfo)) {
        if let Some(entry) = self.players.get_mut(connection_id) {
            f(&mut entry.info);
        }
    }

    fn reset_to_waiting(&mut self, connection_id: &ConnectionId) {
        self.update_player(connection_id, |info| {
            info.ready = false;
            info.match_id = None;
        });
        self.add_waiting(connection_id);
    }

    fn add_waiting(&mut self, connection_id: &ConnectionId) {
        if !self.waiting.contains(connection_id) {
            self.waiting.push(connection_id.clone());
        }
    }

    fn open_match_mut(&mut self, match_id: &MatchId) -> Option<&mut MatchInfo> {
        self.open_matches
            .iter_mut()
            .find(|info| &info.match_id == match_id)
    }

    fn remove_open_match(&mut self, match_id: &MatchId) {
        self.open_matches.retain(|info| &info.match_id != match_id);
    }
}
