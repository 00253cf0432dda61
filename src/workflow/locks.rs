use std::collections::HashMap;
use std::sync::{ Arc, Mutex };
use tokio::sync::{ Mutex as AsyncMutex, OwnedMutexGuard };

/// Serialises conversation turns that share a cache key within this process.
#[derive(Default)]
pub struct TurnLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

pub struct TurnGuard<'a> {
    owner: &'a TurnLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl TurnLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> TurnGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(key.to_string()).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        TurnGuard { owner: self, key: key.to_string(), guard: Some(guard) }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.owner.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Only the map holds the lock once nobody is waiting on it.
        if let Some(lock) = locks.get(&self.key) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(&self.key);
            }
        }
    }
}
