use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::timeout;
use uuid::Uuid;

use crate::utils::error::AppError;

/// Per-key mutual exclusion with a bounded wait. Each live key owns one
/// async mutex; a caller that cannot acquire it within the budget gets
/// `Busy` instead of queueing indefinitely, keeping tail latency bounded on
/// a hot key.
///
/// Entries are created on first use and kept for the life of the process;
/// the key space (venues, bookings) is small relative to the traffic on it.
pub struct LockTable {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
    wait_budget: Duration,
}

impl LockTable {
    pub fn new(wait_budget: Duration) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            wait_budget,
        }
    }

    /// Acquires the lock for `key`, waiting at most the configured budget.
    /// `what` names the contended resource in the `Busy` message.
    pub async fn acquire(&self, key: Uuid, what: &str) -> Result<OwnedMutexGuard<()>, AppError> {
        let lock = {
            let mut locks = match self.locks.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            Arc::clone(locks.entry(key).or_default())
        };

        match timeout(self.wait_budget, lock.lock_owned()).await {
            Ok(guard) => Ok(guard),
            Err(_) => Err(AppError::Busy(format!(
                "{what} {key} is busy, retry with backoff"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequential_acquires_succeed() {
        let table = LockTable::new(Duration::from_millis(50));
        let key = Uuid::new_v4();

        let guard = table.acquire(key, "venue").await.unwrap();
        drop(guard);
        table.acquire(key, "venue").await.unwrap();
    }

    #[tokio::test]
    async fn contended_acquire_times_out_with_busy() {
        let table = LockTable::new(Duration::from_millis(20));
        let key = Uuid::new_v4();

        let _held = table.acquire(key, "venue").await.unwrap();
        let result = table.acquire(key, "venue").await;
        assert!(matches!(result, Err(AppError::Busy(_))));
    }

    #[tokio::test]
    async fn different_keys_do_not_contend() {
        let table = LockTable::new(Duration::from_millis(20));

        let _held = table.acquire(Uuid::new_v4(), "venue").await.unwrap();
        table.acquire(Uuid::new_v4(), "venue").await.unwrap();
    }
}
