// src/adapters/mod.rs
pub mod memory;

pub use memory::MemoryAdapter;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{PointError, PointHistory, TransactionType, UserPoint};

/// Current balance per user.
///
/// Implementors make each call atomic on its own; callers that need a
/// read-modify-write must serialize it themselves.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Balance for `user_id`, or a zero balance if the user was never written.
    async fn select_by_id(&self, user_id: i64) -> Result<UserPoint, PointError>;

    async fn insert_or_update(&self, user_id: i64, point: i64) -> Result<UserPoint, PointError>;
}

/// Append-only record of balance changes.
#[async_trait]
pub trait HistoryLog: Send + Sync {
    /// Append a record; the log assigns its id.
    async fn insert(
        &self,
        user_id: i64,
        amount: i64,
        kind: TransactionType,
        timestamp: DateTime<Utc>,
    ) -> Result<PointHistory, PointError>;

    /// Records for `user_id` in insertion order.
    async fn select_all_by_user_id(&self, user_id: i64) -> Result<Vec<PointHistory>, PointError>;
}
