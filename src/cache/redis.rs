use super::ConversationStore;
use crate::error::CacheError;
use async_trait::async_trait;
use log::{ debug, error };
use redis::aio::MultiplexedConnection;
use redis::{ AsyncCommands, Client, RedisResult };
use std::collections::HashMap;
use std::time::Duration;

pub struct RedisConversationStore {
    conn: MultiplexedConnection,
}

impl RedisConversationStore {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

/// The write commands `put` issues, in order.
#[async_trait]
trait HashWriter: Send {
    async fn hset_fields(&mut self, key: &str, fields: &[(String, String)]) -> RedisResult<()>;
    async fn expire_secs(&mut self, key: &str, seconds: i64) -> RedisResult<()>;
    async fn delete(&mut self, key: &str) -> RedisResult<()>;
}

#[async_trait]
impl HashWriter for MultiplexedConnection {
    async fn hset_fields(&mut self, key: &str, fields: &[(String, String)]) -> RedisResult<()> {
        self.hset_multiple::<_, _, _, ()>(key, fields).await
    }

    async fn expire_secs(&mut self, key: &str, seconds: i64) -> RedisResult<()> {
        self.expire::<_, ()>(key, seconds).await
    }

    async fn delete(&mut self, key: &str) -> RedisResult<()> {
        self.del::<_, ()>(key).await
    }
}

/// EXPIRE argument for `ttl`: at least one second, saturating at `i64::MAX`.
fn expire_seconds(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX).max(1)
}

async fn write_with_expiry<W: HashWriter>(
    conn: &mut W,
    key: &str,
    fields: &[(String, String)],
    ttl: Duration
) -> Result<(), CacheError> {
    conn.hset_fields(key, fields).await.map_err(|e| {
        error!("Error storing item {} in cache: {}", key, e);
        e
    })?;

    if let Err(source) = conn.expire_secs(key, expire_seconds(ttl)).await {
        // A conversation key without expiration would never reset.
        error!("Error setting expiration on {}: {}. Removing the key.", key, source);
        if let Err(e) = conn.delete(key).await {
            error!("Unable to remove un-expiring key {}: {}", key, e);
        }
        return Err(CacheError::ExpireFailed { key: key.to_string(), source });
    }
    Ok(())
}

#[async_trait]
impl ConversationStore for RedisConversationStore {
    async fn get(&self, key: &str) -> Result<Option<HashMap<String, String>>, CacheError> {
        let mut conn = self.conn.clone();
        let fields = conn.hgetall::<_, HashMap<String, String>>(key).await.map_err(|e| {
            error!("Error retrieving key {} from cache: {}", key, e);
            e
        })?;

        if fields.is_empty() {
            debug!("Key not found in cache: {}", key);
            return Ok(None);
        }
        Ok(Some(fields))
    }

    async fn put(
        &self,
        key: &str,
        fields: &[(String, String)],
        ttl: Duration
    ) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        write_with_expiry(&mut conn, key, fields, ttl).await
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }
}
