// src/error.rs
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointError {
    InvalidAmount,
    InvalidPoint(i64),
    LimitExceeded { current: i64, amount: i64, max: i64 },
    InsufficientBalance { current: i64, amount: i64 },
    LockTimeout,
    Storage(String),
}

impl fmt::Display for PointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount => write!(f, "Invalid amount"),
            Self::InvalidPoint(point) => write!(f, "Invalid point value: {}", point),
            Self::LimitExceeded {
                current,
                amount,
                max,
            } => write!(
                f,
                "Point limit exceeded: {} + {} is above {}",
                current, amount, max
            ),
            Self::InsufficientBalance { current, amount } => {
                write!(f, "Insufficient balance: {} - {} is below 0", current, amount)
            }
            Self::LockTimeout => write!(f, "Timed out waiting for user lock"),
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for PointError {}

impl PointError {
    /// Short label used as a metrics tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "invalid_amount",
            Self::InvalidPoint(_) => "invalid_point",
            Self::LimitExceeded { .. } => "limit_exceeded",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::LockTimeout => "lock_timeout",
            Self::Storage(_) => "storage",
        }
    }
}
