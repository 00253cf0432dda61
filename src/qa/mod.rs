pub mod mendable;

use crate::cli::Args;
use crate::error::QaError;
use crate::models::chat::HistoryItem;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use self::mendable::MendableClient;

/// Substituted when the provider answers with empty text.
pub const NO_ANSWER_FOUND: &str =
    "I'm sorry, I couldn't find an answer to your question. Please provide me feedback and try rephrasing your question.";

#[derive(Clone, Debug, PartialEq)]
pub struct QueryResponse {
    pub conversation_id: i64,
    pub message_id: i64,
    pub question: String,
    pub answer: String,
    pub links: Vec<String>,
    pub confidence: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rating {
    Positive,
    Negative,
}

impl Rating {
    pub fn value(self) -> i8 {
        match self {
            Rating::Positive => 1,
            Rating::Negative => -1,
        }
    }
}

#[async_trait]
pub trait QaClient: Send + Sync {
    /// Opens a new multi-turn conversation and returns its id.
    async fn create_conversation(&self) -> Result<i64, QaError>;

    /// Asks `question` within `conversation_id`, sending the full `history`.
    async fn ask(
        &self,
        question: &str,
        history: &[HistoryItem],
        conversation_id: i64
    ) -> Result<QueryResponse, QaError>;

    async fn send_rating(&self, message_id: i64, rating: Rating) -> Result<(), QaError>;
}

#[derive(Clone, Debug)]
pub struct QaConfig {
    pub api_key: String,
    pub base_url: String,
    pub docs_root_url: String,
    pub create_timeout: Duration,
    pub ask_timeout: Duration,
    pub rating_timeout: Duration,
}

impl From<&Args> for QaConfig {
    fn from(args: &Args) -> Self {
        Self {
            api_key: args.qa_api_key.clone(),
            base_url: args.qa_base_url.clone(),
            docs_root_url: args.docs_root_url.clone(),
            create_timeout: Duration::from_secs(args.qa_create_timeout_secs),
            ask_timeout: Duration::from_secs(args.qa_ask_timeout_secs),
            rating_timeout: Duration::from_secs(args.qa_create_timeout_secs),
        }
    }
}

pub fn new_client(config: QaConfig, http: reqwest::Client) -> Arc<dyn QaClient> {
    Arc::new(MendableClient::new(config, http))
}

/// Drops empty links and the documentation root, keeping the first
/// occurrence of every other link in its original position.
pub fn unique_links<'a, I>(links: I, docs_root_url: &str) -> Vec<String>
    where I: IntoIterator<Item = &'a str>
{
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| !link.is_empty() && *link != docs_root_url)
        .filter(|link| seen.insert(*link))
        .map(str::to_string)
        .collect()
}
