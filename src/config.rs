// src/config.rs
use std::time::Duration;

use serde::Deserialize;

use crate::balance::{MAX_POINT, MIN_POINT};

/// Tunables for a [`PointService`](crate::PointService).
///
/// Deserializes from any serde source; missing fields fall back to
/// [`PointConfig::default`]. `acquire_timeout_ms` absent means callers wait
/// for their turn on a user indefinitely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PointConfig {
    pub max_point: i64,
    pub acquire_timeout_ms: Option<u64>,
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            max_point: MAX_POINT,
            acquire_timeout_ms: None,
        }
    }
}

impl PointConfig {
    pub fn with_max_point(mut self, max_point: i64) -> Self {
        self.max_point = max_point;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Charge limit actually applied, kept within `MIN_POINT..=MAX_POINT`
    /// however the config was built.
    pub fn effective_max_point(&self) -> i64 {
        self.max_point.clamp(MIN_POINT, MAX_POINT)
    }

    pub fn acquire_timeout(&self) -> Option<Duration> {
        self.acquire_timeout_ms.map(Duration::from_millis)
    }
}
