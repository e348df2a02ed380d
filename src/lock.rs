// src/lock.rs
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use tokio::sync::Mutex as KeyMutex;
use tokio::time::error::Elapsed;

/// Map of keys to fair async mutexes.
///
/// Each key gets its own [`tokio::sync::Mutex`], created on first use. That
/// mutex queues waiters FIFO, so a busy key cannot starve a late caller. The
/// outer map lock is only taken to look up or insert an entry and is never
/// held across an `.await`, so unrelated keys never wait on each other.
///
/// Entries are kept until [`KeyLockRegistry::evict_idle`] is called. A
/// long-lived registry over an unbounded key space grows accordingly.
pub struct KeyLockRegistry<K> {
    locks: Mutex<HashMap<K, Arc<KeyMutex<()>>>>,
}

impl<K> KeyLockRegistry<K>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Run `op` while holding the lock for `key`.
    ///
    /// The lock is released however `op` finishes: normal return, an `Err`
    /// value, a panic, or the returned future being dropped. The output of
    /// `op` is passed through untouched.
    pub async fn run_exclusive<F, Fut, T>(&self, key: K, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let lock = self.entry(&key);
        let started = Instant::now();
        let _guard = lock.lock().await;
        histogram!("pointbook.lock.wait_ms").record(started.elapsed().as_secs_f64() * 1_000.0);

        op().await
    }

    /// Like [`run_exclusive`](Self::run_exclusive), but gives up with
    /// [`Elapsed`] if the key is not acquired within `timeout`. `op` is not
    /// started in that case.
    pub async fn run_exclusive_timeout<F, Fut, T>(
        &self,
        key: K,
        timeout: Duration,
        op: F,
    ) -> Result<T, Elapsed>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let lock = self.entry(&key);
        let started = Instant::now();
        let _guard = match tokio::time::timeout(timeout, lock.lock()).await {
            Ok(guard) => guard,
            Err(elapsed) => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                counter!("pointbook.lock.timeouts").increment(1);
                tracing::warn!(key = ?key, timeout_ms, "lock acquisition timed out");
                return Err(elapsed);
            }
        };
        histogram!("pointbook.lock.wait_ms").record(started.elapsed().as_secs_f64() * 1_000.0);

        Ok(op().await)
    }

    /// Drop entries nobody holds or waits on. Returns how many were removed.
    pub fn evict_idle(&self) -> usize {
        let mut locks = self.map();
        let before = locks.len();
        // Handles are only cloned under the map lock, so a count of one
        // cannot grow while we hold it.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        let evicted = before - locks.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = locks.len(), "evicted idle key locks");
        }
        evicted
    }

    /// Whether some caller currently holds `key`.
    pub fn is_held(&self, key: &K) -> bool {
        self.map()
            .get(key)
            .is_some_and(|lock| lock.try_lock().is_err())
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    fn entry(&self, key: &K) -> Arc<KeyMutex<()>> {
        let mut locks = self.map();
        match locks.get(key) {
            Some(lock) => Arc::clone(lock),
            None => {
                let lock = Arc::new(KeyMutex::new(()));
                locks.insert(key.clone(), Arc::clone(&lock));
                lock
            }
        }
    }

    fn map(&self) -> MutexGuard<'_, HashMap<K, Arc<KeyMutex<()>>>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K> Default for KeyLockRegistry<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
