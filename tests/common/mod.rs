#![allow(dead_code)]

use async_trait::async_trait;
use docs_askbot::cache::memory::MemoryConversationStore;
use docs_askbot::cache::ConversationStore;
use docs_askbot::error::{ CacheError, QaError, ReplyError };
use docs_askbot::models::chat::HistoryItem;
use docs_askbot::qa::{ QaClient, QueryResponse, Rating };
use docs_askbot::slack::blocks::SlackPayload;
use docs_askbot::slack::messages::wait_payload;
use docs_askbot::slack::reply::ReplyDispatcher;
use docs_askbot::workflow::{ AskRequest, AskSettings, AskWorkflow };
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::atomic::{ AtomicBool, AtomicI64, Ordering };
use std::sync::{ Arc, Mutex };
use std::time::Duration;

pub const RESPONSE_URL: &str = "https://hooks.slack.test/commands/T1/1";

#[derive(Clone, Debug)]
pub struct AskCall {
    pub question: String,
    pub history: Vec<HistoryItem>,
    pub conversation_id: i64,
}

/// Scripted Q&A provider that records every call.
#[derive(Default)]
pub struct FakeQa {
    next_conversation: AtomicI64,
    next_message: AtomicI64,
    pub answer: Mutex<String>,
    pub fail_create: AtomicBool,
    pub fail_ask: AtomicBool,
    pub fail_rating: AtomicBool,
    pub creates: Mutex<u32>,
    pub asks: Mutex<Vec<AskCall>>,
    pub ratings: Mutex<Vec<(i64, Rating)>>,
}

impl FakeQa {
    pub fn new() -> Self {
        let qa = Self::default();
        qa.next_conversation.store(100, Ordering::SeqCst);
        qa.next_message.store(5000, Ordering::SeqCst);
        *qa.answer.lock().unwrap() = "Use the palette CLI.".to_string();
        qa
    }

    pub fn asks(&self) -> Vec<AskCall> {
        self.asks.lock().unwrap().clone()
    }

    pub fn creates(&self) -> u32 {
        *self.creates.lock().unwrap()
    }

    pub fn ratings(&self) -> Vec<(i64, Rating)> {
        self.ratings.lock().unwrap().clone()
    }
}

fn provider_error() -> QaError {
    QaError::Status { status: 500, body: "provider unavailable".into() }
}

#[async_trait]
impl QaClient for FakeQa {
    async fn create_conversation(&self) -> Result<i64, QaError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(provider_error());
        }
        *self.creates.lock().unwrap() += 1;
        Ok(self.next_conversation.fetch_add(1, Ordering::SeqCst))
    }

    async fn ask(
        &self,
        question: &str,
        history: &[HistoryItem],
        conversation_id: i64
    ) -> Result<QueryResponse, QaError> {
        self.asks.lock().unwrap().push(AskCall {
            question: question.to_string(),
            history: history.to_vec(),
            conversation_id,
        });
        if self.fail_ask.load(Ordering::SeqCst) {
            return Err(provider_error());
        }
        // Yields so concurrent turns can interleave if nothing serializes them.
        tokio::time::sleep(Duration::from_millis(5)).await;
        let answer = self.answer.lock().unwrap().clone();
        Ok(QueryResponse {
            conversation_id,
            message_id: self.next_message.fetch_add(1, Ordering::SeqCst),
            question: question.to_string(),
            answer,
            links: vec!["https://docs.spectrocloud.com/cli".into()],
            confidence: None,
        })
    }

    async fn send_rating(&self, message_id: i64, rating: Rating) -> Result<(), QaError> {
        if self.fail_rating.load(Ordering::SeqCst) {
            return Err(provider_error());
        }
        self.ratings.lock().unwrap().push((message_id, rating));
        Ok(())
    }
}

/// Records what would have been posted to Slack.
#[derive(Default)]
pub struct RecordingReplies {
    pub fail_reply: AtomicBool,
    pub fail_error_reply: AtomicBool,
    pub replies: Mutex<Vec<(String, JsonValue)>>,
    pub error_replies: Mutex<Vec<(String, bool)>>,
}

impl RecordingReplies {
    pub fn replies(&self) -> Vec<(String, JsonValue)> {
        self.replies.lock().unwrap().clone()
    }

    pub fn error_replies(&self) -> Vec<(String, bool)> {
        self.error_replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyDispatcher for RecordingReplies {
    async fn reply(&self, response_url: &str, payload: &SlackPayload) -> Result<(), ReplyError> {
        if response_url.is_empty() {
            return Err(ReplyError::EmptyResponseUrl);
        }
        if self.fail_reply.load(Ordering::SeqCst) {
            return Err(ReplyError::Status { status: 500, body: "slack down".into() });
        }
        let value = serde_json::to_value(payload)?;
        self.replies.lock().unwrap().push((response_url.to_string(), value));
        Ok(())
    }

    fn reply_ack(&self, response_url: &str) -> Result<SlackPayload, ReplyError> {
        if response_url.is_empty() {
            return Err(ReplyError::EmptyResponseUrl);
        }
        Ok(wait_payload())
    }

    async fn reply_error(&self, response_url: &str, is_private: bool) -> Result<(), ReplyError> {
        if response_url.is_empty() {
            return Err(ReplyError::EmptyResponseUrl);
        }
        if self.fail_error_reply.load(Ordering::SeqCst) {
            return Err(ReplyError::Status { status: 500, body: "slack down".into() });
        }
        self.error_replies.lock().unwrap().push((response_url.to_string(), is_private));
        Ok(())
    }
}

/// Reads succeed with nothing stored; every write fails.
pub struct FailingStore;

#[async_trait]
impl ConversationStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<HashMap<String, String>>, CacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &str,
        _fields: &[(String, String)],
        _ttl: Duration
    ) -> Result<(), CacheError> {
        Err(connection_reset())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Every call fails as if redis dropped the connection.
pub struct UnreachableStore;

fn connection_reset() -> CacheError {
    CacheError::Redis(redis::RedisError::from((redis::ErrorKind::IoError, "connection reset")))
}

#[async_trait]
impl ConversationStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<HashMap<String, String>>, CacheError> {
        Err(connection_reset())
    }

    async fn put(
        &self,
        _key: &str,
        _fields: &[(String, String)],
        _ttl: Duration
    ) -> Result<(), CacheError> {
        Err(connection_reset())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(connection_reset())
    }
}

pub struct Harness {
    pub store: Arc<MemoryConversationStore>,
    pub qa: Arc<FakeQa>,
    pub replies: Arc<RecordingReplies>,
    pub workflow: Arc<AskWorkflow>,
}

pub fn settings() -> AskSettings {
    AskSettings { namespace: "docs_bot:user_id:channel_id".into(), ttl: Duration::from_secs(900) }
}

pub fn harness() -> Harness {
    let store = Arc::new(MemoryConversationStore::new());
    let qa = Arc::new(FakeQa::new());
    let replies = Arc::new(RecordingReplies::default());
    let workflow = Arc::new(
        AskWorkflow::new(store.clone(), qa.clone(), replies.clone(), settings())
    );
    Harness { store, qa, replies, workflow }
}

pub fn ask_request(user_id: &str, text: &str) -> AskRequest {
    AskRequest {
        user_id: user_id.to_string(),
        channel_id: "C024BE91L".to_string(),
        text: text.to_string(),
        response_url: RESPONSE_URL.to_string(),
        is_private: false,
    }
}
