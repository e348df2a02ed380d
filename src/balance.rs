// src/balance.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PointError;

pub const MIN_POINT: i64 = 0;
pub const MAX_POINT: i64 = 1_000_000;

/// Current point balance of a single user.
///
/// Every value in circulation satisfies `MIN_POINT <= point <= MAX_POINT`.
/// Construction goes through [`UserPoint::new`], so an out-of-range value
/// can never be handed to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPoint {
    pub id: i64,
    pub point: i64,
    pub updated_at: DateTime<Utc>,
}

impl UserPoint {
    pub fn new(id: i64, point: i64, updated_at: DateTime<Utc>) -> Result<Self, PointError> {
        if !(MIN_POINT..=MAX_POINT).contains(&point) {
            return Err(PointError::InvalidPoint(point));
        }
        Ok(Self {
            id,
            point,
            updated_at,
        })
    }

    /// Balance of a user that has never been written.
    pub fn empty(id: i64) -> Self {
        Self {
            id,
            point: MIN_POINT,
            updated_at: Utc::now(),
        }
    }

    /// Point value after adding `amount`, bounded by `max`.
    pub fn charged(&self, amount: i64, max: i64) -> Result<i64, PointError> {
        if amount <= 0 {
            return Err(PointError::InvalidAmount);
        }
        let exceeded = PointError::LimitExceeded {
            current: self.point,
            amount,
            max,
        };
        match self.point.checked_add(amount) {
            Some(next) if next <= max => Ok(next),
            _ => Err(exceeded),
        }
    }

    /// Point value after subtracting `amount`.
    pub fn used(&self, amount: i64) -> Result<i64, PointError> {
        if amount <= 0 {
            return Err(PointError::InvalidAmount);
        }
        let next = self.point - amount;
        if next < MIN_POINT {
            return Err(PointError::InsufficientBalance {
                current: self.point,
                amount,
            });
        }
        Ok(next)
    }
}
