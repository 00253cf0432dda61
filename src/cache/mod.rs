pub mod memory;
pub mod redis;

use crate::cli::Args;
use crate::error::CacheError;
use async_trait::async_trait;
use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Hash storage with per-key expiration, holding one conversation per key.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Returns every field stored under `key`, or `None` when the key is
    /// absent or expired.
    async fn get(&self, key: &str) -> Result<Option<HashMap<String, String>>, CacheError>;

    /// Writes all `fields` under `key` and (re)sets its expiration to `ttl`.
    async fn put(
        &self,
        key: &str,
        fields: &[(String, String)],
        ttl: Duration
    ) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}

/// The only addressing scheme of the store: `<namespace>:<user>:<channel>`.
pub fn conversation_key(namespace: &str, user_id: &str, channel_id: &str) -> String {
    format!("{}:{}:{}", namespace, user_id, channel_id)
}

pub async fn create_store(args: &Args) -> Result<Arc<dyn ConversationStore>, CacheError> {
    match args.cache_type.to_lowercase().as_str() {
        "redis" => {
            info!(
                "Conversations will be stored in redis at {}:{} (tls: {})",
                args.redis_host,
                args.redis_port,
                args.redis_tls
            );
            let store = redis::RedisConversationStore::connect(&args.redis_url()).await?;
            Ok(Arc::new(store))
        }
        "memory" => {
            info!("Conversations will be stored in process memory");
            Ok(Arc::new(memory::MemoryConversationStore::new()))
        }
        other => Err(CacheError::UnsupportedType(other.to_string())),
    }
}
