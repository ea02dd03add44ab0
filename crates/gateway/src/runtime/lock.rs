//! Per-conversation concurrency control.
//!
//! Each conversation key maps to a `Semaphore(1)`. Holding the permit
//! serializes turns within one conversation, which also makes the
//! create-if-absent paths in the runner cache and the session initializer
//! race-free. A second request for the same conversation waits for the
//! in-flight turn instead of racing it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Manages per-key run locks.
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl Default for KeyedLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the lock for a key, waiting for any current holder. The
    /// permit releases on drop.
    pub async fn acquire(&self, key: &str) -> OwnedSemaphorePermit {
        let sem = {
            let mut locks = self.locks.lock();
            locks
                .entry(key.to_owned())
                .or_insert_with(|| Arc::new(Semaphore::new(1)))
                .clone()
        };

        match sem.acquire_owned().await {
            Ok(permit) => permit,
            // The semaphores are never closed.
            Err(_) => unreachable!("conversation semaphore closed"),
        }
    }

    /// Number of tracked keys (for monitoring and tests).
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}
