//! プレイヤーエンティティ生成の実装
//!
//! - `inmemory`: 接続 ID とマッチ ID の対応を HashMap で保持する実装

pub mod inmemory;

pub use inmemory::InMemoryPlayerSpawner;
