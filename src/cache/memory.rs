use super::ConversationStore;
use crate::error::CacheError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{ Duration, Instant };
use tokio::sync::Mutex;

struct Entry {
    fields: HashMap<String, String>,
    expires_at: Instant,
}

/// Process-local store. Expired keys are dropped lazily on access.
#[derive(Default)]
pub struct MemoryConversationStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining time before `key` expires.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.lock().await;
        entries.get(key).and_then(|e| e.expires_at.checked_duration_since(Instant::now()))
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn get(&self, key: &str) -> Result<Option<HashMap<String, String>>, CacheError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.fields.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &str,
        fields: &[(String, String)],
        ttl: Duration
    ) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            fields: HashMap::new(),
            expires_at: now,
        });
        if entry.expires_at <= now {
            entry.fields.clear();
        }
        for (name, value) in fields {
            entry.fields.insert(name.clone(), value.clone());
        }
        entry.expires_at = now + ttl;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
