use super::locks::TurnLocks;
use crate::cache::{ conversation_key, ConversationStore };
use crate::cli::Args;
use crate::error::AskError;
use crate::models::chat::{ ConversationRecord, HistoryItem };
use crate::qa::{ QaClient, QueryResponse };
use crate::slack::messages::answer_payload;
use crate::slack::reply::ReplyDispatcher;
use log::{ debug, error, info };
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// An already validated `ask`/`pask` invocation.
#[derive(Clone, Debug)]
pub struct AskRequest {
    pub user_id: String,
    pub channel_id: String,
    /// Full command text, keyword included.
    pub text: String,
    pub response_url: String,
    pub is_private: bool,
}

#[derive(Clone, Debug)]
pub struct AskSettings {
    pub namespace: String,
    pub ttl: Duration,
}

impl Default for AskSettings {
    fn default() -> Self {
        Self {
            namespace: "docs_bot:user_id:channel_id".to_string(),
            ttl: Duration::from_secs(15 * 60),
        }
    }
}

impl From<&Args> for AskSettings {
    fn from(args: &Args) -> Self {
        Self { namespace: args.cache_namespace.clone(), ttl: args.cache_ttl() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AskOutcome {
    /// The answer was delivered.
    Answered,
    /// A step failed and the apology was delivered instead.
    Failed,
    /// A step failed and the apology could not be delivered either.
    Undelivered,
}

/// Conversation state for the turn being answered.
struct Turn {
    conversation_id: i64,
    history: Vec<HistoryItem>,
    counter: u32,
}

impl Turn {
    fn start(conversation_id: i64) -> Self {
        Self { conversation_id, history: Vec::new(), counter: 1 }
    }

    fn resume(record: ConversationRecord) -> Self {
        Self {
            conversation_id: record.conversation_id,
            history: record.history,
            counter: record.counter.saturating_add(1),
        }
    }

    fn finish(mut self, req: &AskRequest, response: &QueryResponse) -> ConversationRecord {
        self.history.push(HistoryItem::new(response.question.clone(), response.answer.clone()));
        ConversationRecord {
            user_id: req.user_id.clone(),
            channel_id: req.channel_id.clone(),
            conversation_id: self.conversation_id,
            last_question: response.question.clone(),
            last_answer: response.answer.clone(),
            history: self.history,
            counter: self.counter,
        }
    }
}

/// Text after the command keyword, without trailing line breaks.
pub fn extract_question(text: &str) -> Result<String, AskError> {
    let question = text
        .trim_start()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim_end_matches(['\r', '\n']).trim())
        .unwrap_or_default();

    if question.is_empty() {
        return Err(AskError::EmptyQuestion);
    }
    Ok(question.to_string())
}

pub struct AskWorkflow {
    store: Arc<dyn ConversationStore>,
    qa: Arc<dyn QaClient>,
    replies: Arc<dyn ReplyDispatcher>,
    settings: AskSettings,
    locks: TurnLocks,
}

impl AskWorkflow {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        qa: Arc<dyn QaClient>,
        replies: Arc<dyn ReplyDispatcher>,
        settings: AskSettings
    ) -> Self {
        Self { store, qa, replies, settings, locks: TurnLocks::new() }
    }

    /// Runs the workflow on a detached task. The caller may drop the handle;
    /// the task reports back to the user through the response URL.
    pub fn spawn(self: &Arc<Self>, req: AskRequest) -> JoinHandle<AskOutcome> {
        let workflow = Arc::clone(self);
        tokio::spawn(async move { workflow.run(req).await })
    }

    /// Answers one question and sends exactly one message back: the answer
    /// or the apology.
    pub async fn run(&self, req: AskRequest) -> AskOutcome {
        let request_id = Uuid::new_v4();
        let key = conversation_key(&self.settings.namespace, &req.user_id, &req.channel_id);
        debug!("[{}] ask for {} (private: {})", request_id, key, req.is_private);

        let _turn = self.locks.acquire(&key).await;

        match self.answer(&req, &key).await {
            Ok(()) => {
                info!("[{}] answer delivered to {}", request_id, req.user_id);
                AskOutcome::Answered
            }
            Err(e) => {
                error!("[{}] ask failed for {}: {}", request_id, key, e);
                match self.replies.reply_error(&req.response_url, req.is_private).await {
                    Ok(()) => AskOutcome::Failed,
                    Err(e) => {
                        error!("[{}] unable to deliver the error reply: {}", request_id, e);
                        AskOutcome::Undelivered
                    }
                }
            }
        }
    }

    async fn answer(&self, req: &AskRequest, key: &str) -> Result<(), AskError> {
        let question = extract_question(&req.text)?;
        debug!("User query: {}", question);

        let turn = match self.store.get(key).await? {
            None => {
                debug!("Creating a new conversation for user: {}", req.user_id);
                Turn::start(self.qa.create_conversation().await?)
            }
            Some(fields) => {
                debug!("Using existing conversation for user: {}", req.user_id);
                Turn::resume(ConversationRecord::from_fields(&fields)?)
            }
        };

        let response = self.qa.ask(&question, &turn.history, turn.conversation_id).await?;

        let record = turn.finish(req, &response);
        self.store.put(key, &record.to_fields()?, self.settings.ttl).await?;

        let payload = answer_payload(&response, req.is_private);
        self.replies.reply(&req.response_url, &payload).await?;
        Ok(())
    }
}
