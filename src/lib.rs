// src/lib.rs
//! # Pointbook
//!
//! A per-user point wallet. Each user has one integer balance, bounded to
//! `0..=1_000_000`, and an append-only history of every charge and spend.
//!
//! ## Concurrency
//!
//! Balance changes are read-modify-write. Two unsynchronized charges for the
//! same user would both read the same balance and one of them would be lost.
//! [`KeyLockRegistry`] hands out one fair async mutex per user id, and
//! [`PointService`] runs every mutation for that user while holding it.
//! Different users never share a lock, so they proceed in parallel.
//!
//! ```rust,ignore
//! let service = PointService::in_memory(PointConfig::default());
//!
//! service.charge(1, 1_000).await?;
//! let balance = service.use_points(1, 300).await?;
//! assert_eq!(balance.point, 700);
//! ```
//!
//! ## Storage
//!
//! Balances and history sit behind [`BalanceStore`] and [`HistoryLog`].
//! [`MemoryAdapter`] implements both in process. Stores only guarantee that
//! each single call is atomic; cross-call exclusivity comes from the registry.

pub mod adapters;
pub mod balance;
pub mod config;
pub mod error;
pub mod history;
pub mod lock;
pub mod service;

pub use adapters::{BalanceStore, HistoryLog, MemoryAdapter};
pub use balance::{MAX_POINT, MIN_POINT, UserPoint};
pub use config::PointConfig;
pub use error::PointError;
pub use history::{PointHistory, TransactionType};
pub use lock::KeyLockRegistry;
pub use service::PointService;
