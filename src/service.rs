// src/service.rs
use std::future::Future;
use std::sync::Arc;

use metrics::{counter, histogram};

use crate::{
    BalanceStore, HistoryLog, KeyLockRegistry, MemoryAdapter, PointConfig, PointError,
    PointHistory, TransactionType, UserPoint,
};

/// Charges and spends user points.
///
/// Every mutation for a user runs inside that user's key lock, so the read of
/// the current balance, the balance write and the history append happen as one
/// step as far as any other caller on the same user can tell. Reads go straight
/// to the stores.
#[derive(Clone)]
pub struct PointService {
    balances: Arc<dyn BalanceStore>,
    history: Arc<dyn HistoryLog>,
    locks: Arc<KeyLockRegistry<i64>>,
    config: PointConfig,
}

impl PointService {
    pub fn new(
        balances: Arc<dyn BalanceStore>,
        history: Arc<dyn HistoryLog>,
        locks: Arc<KeyLockRegistry<i64>>,
        config: PointConfig,
    ) -> Self {
        Self {
            balances,
            history,
            locks,
            config,
        }
    }

    /// Service over a fresh [`MemoryAdapter`] and lock registry.
    pub fn in_memory(config: PointConfig) -> Self {
        let adapter = Arc::new(MemoryAdapter::new());
        Self::new(
            Arc::clone(&adapter) as Arc<dyn BalanceStore>,
            adapter,
            Arc::new(KeyLockRegistry::new()),
            config,
        )
    }

    pub fn locks(&self) -> &Arc<KeyLockRegistry<i64>> {
        &self.locks
    }

    pub fn config(&self) -> &PointConfig {
        &self.config
    }

    pub async fn get_user_point(&self, user_id: i64) -> Result<UserPoint, PointError> {
        self.balances.select_by_id(user_id).await
    }

    pub async fn get_point_history(&self, user_id: i64) -> Result<Vec<PointHistory>, PointError> {
        self.history.select_all_by_user_id(user_id).await
    }

    pub async fn charge(&self, user_id: i64, amount: i64) -> Result<UserPoint, PointError> {
        self.mutate(user_id, amount, TransactionType::Charge).await
    }

    pub async fn use_points(&self, user_id: i64, amount: i64) -> Result<UserPoint, PointError> {
        self.mutate(user_id, amount, TransactionType::Use).await
    }

    #[tracing::instrument(skip(self, kind), fields(kind = kind.as_str()))]
    async fn mutate(
        &self,
        user_id: i64,
        amount: i64,
        kind: TransactionType,
    ) -> Result<UserPoint, PointError> {
        let result = if amount <= 0 {
            Err(PointError::InvalidAmount)
        } else {
            self.exclusive(user_id, || self.apply(user_id, amount, kind))
                .await
        };

        let status = match &result {
            Ok(updated) => {
                tracing::debug!(point = updated.point, "point balance updated");
                "success"
            }
            Err(err) => {
                tracing::warn!(error = %err, "point mutation rejected");
                err.kind()
            }
        };
        counter!("pointbook.mutations.total", "kind" => kind.as_str(), "status" => status)
            .increment(1);

        result
    }

    async fn exclusive<F, Fut>(&self, user_id: i64, op: F) -> Result<UserPoint, PointError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<UserPoint, PointError>>,
    {
        match self.config.acquire_timeout() {
            Some(timeout) => {
                self.locks
                    .run_exclusive_timeout(user_id, timeout, op)
                    .await
                    .map_err(|_| PointError::LockTimeout)?
            }
            None => self.locks.run_exclusive(user_id, op).await,
        }
    }

    // Caller holds the key lock for `user_id`.
    async fn apply(
        &self,
        user_id: i64,
        amount: i64,
        kind: TransactionType,
    ) -> Result<UserPoint, PointError> {
        let current = self.balances.select_by_id(user_id).await?;
        let max_point = self.config.effective_max_point();
        let next = match kind {
            TransactionType::Charge => current.charged(amount, max_point)?,
            TransactionType::Use => current.used(amount)?,
        };

        let updated = self.balances.insert_or_update(user_id, next).await?;
        if let Err(err) = self
            .history
            .insert(user_id, amount, kind, updated.updated_at)
            .await
        {
            tracing::error!(error = %err, "history append failed, restoring balance");
            if let Err(restore_err) = self
                .balances
                .insert_or_update(user_id, current.point)
                .await
            {
                tracing::error!(
                    error = %restore_err,
                    point = next,
                    "balance restore failed, stored point has no history record"
                );
                return Err(PointError::Storage(format!(
                    "{}; restoring balance also failed: {}",
                    err, restore_err
                )));
            }
            return Err(err);
        }

        histogram!("pointbook.mutation.amount", "kind" => kind.as_str()).record(amount as f64);
        Ok(updated)
    }
}
