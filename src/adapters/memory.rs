// src/adapters/memory.rs
use crate::{BalanceStore, HistoryLog, PointError, PointHistory, TransactionType, UserPoint};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
struct MemoryStore {
    points: Arc<Mutex<HashMap<i64, UserPoint>>>,
    histories: Arc<Mutex<Vec<PointHistory>>>,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            points: Arc::new(Mutex::new(HashMap::new())),
            histories: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

fn guard<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, PointError> {
    mutex
        .lock()
        .map_err(|_| PointError::Storage("memory table lock poisoned".to_string()))
}

/// In-process `BalanceStore` and `HistoryLog`.
///
/// Clones share the same tables.
#[derive(Clone)]
pub struct MemoryAdapter {
    store: MemoryStore,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }

    /// Number of users with a stored balance.
    pub fn user_count(&self) -> Result<usize, PointError> {
        Ok(guard(&self.store.points)?.len())
    }

    /// Total number of history records across all users.
    pub fn history_len(&self) -> Result<usize, PointError> {
        Ok(guard(&self.store.histories)?.len())
    }
}

#[async_trait]
impl BalanceStore for MemoryAdapter {
    async fn select_by_id(&self, user_id: i64) -> Result<UserPoint, PointError> {
        let points = guard(&self.store.points)?;
        Ok(points
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| UserPoint::empty(user_id)))
    }

    async fn insert_or_update(&self, user_id: i64, point: i64) -> Result<UserPoint, PointError> {
        let user_point = UserPoint::new(user_id, point, Utc::now())?;
        let mut points = guard(&self.store.points)?;
        points.insert(user_id, user_point.clone());
        Ok(user_point)
    }
}

#[async_trait]
impl HistoryLog for MemoryAdapter {
    async fn insert(
        &self,
        user_id: i64,
        amount: i64,
        kind: TransactionType,
        timestamp: DateTime<Utc>,
    ) -> Result<PointHistory, PointError> {
        let mut histories = guard(&self.store.histories)?;
        let id = histories.len() as i64 + 1;
        let record = PointHistory::new(id, user_id, kind, amount, timestamp);
        histories.push(record.clone());
        Ok(record)
    }

    async fn select_all_by_user_id(&self, user_id: i64) -> Result<Vec<PointHistory>, PointError> {
        let histories = guard(&self.store.histories)?;
        Ok(histories
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}
