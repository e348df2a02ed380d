// src/history.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Charge,
    Use,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Charge => "CHARGE",
            Self::Use => "USE",
        }
    }
}

/// One balance change, as recorded by a [`HistoryLog`](crate::HistoryLog).
///
/// `amount` is the magnitude of the change; the direction comes from `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointHistory {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: i64,
    pub timestamp: DateTime<Utc>,
}

impl PointHistory {
    pub fn new(
        id: i64,
        user_id: i64,
        kind: TransactionType,
        amount: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            kind,
            amount,
            timestamp,
        }
    }
}
