use crate::error::FeedbackError;
use crate::models::slack::ActionEvent;
use crate::qa::{ QaClient, Rating };
use crate::slack::blocks::SlackPayload;
use crate::slack::messages::{
    rated_answer_payload,
    rating_thanks_payload,
    ACTION_NEGATIVE_FEEDBACK,
    ACTION_POSITIVE_FEEDBACK,
};
use crate::slack::reply::ReplyDispatcher;
use log::{ debug, error, info };
use std::sync::Arc;
use tokio::task::JoinHandle;

const QUESTION_BLOCK: usize = 2;
const ANSWER_BLOCK: usize = 4;
const SOURCES_BLOCK: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Rating recorded and the original message rewritten.
    Rated,
    /// Rating recorded but the original message could not be read back,
    /// so only a thank-you was sent.
    Acknowledged,
    Failed,
    Undelivered,
}

/// Maps a button `action_id` to the rating it stands for.
pub fn rating_for_action(action_id: &str) -> Option<Rating> {
    match action_id {
        ACTION_POSITIVE_FEEDBACK => Some(Rating::Positive),
        ACTION_NEGATIVE_FEEDBACK => Some(Rating::Negative),
        _ => None,
    }
}

pub struct FeedbackWorkflow {
    qa: Arc<dyn QaClient>,
    replies: Arc<dyn ReplyDispatcher>,
}

impl FeedbackWorkflow {
    pub fn new(qa: Arc<dyn QaClient>, replies: Arc<dyn ReplyDispatcher>) -> Self {
        Self { qa, replies }
    }

    pub fn spawn(self: &Arc<Self>, event: ActionEvent, rating: Rating) -> JoinHandle<FeedbackOutcome> {
        let workflow = Arc::clone(self);
        tokio::spawn(async move { workflow.run(event, rating).await })
    }

    pub async fn run(&self, event: ActionEvent, rating: Rating) -> FeedbackOutcome {
        let is_private = event.container.is_ephemeral;
        match self.rate(&event, rating).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Feedback handling failed: {}", e);
                match self.replies.reply_error(&event.response_url, is_private).await {
                    Ok(()) => FeedbackOutcome::Failed,
                    Err(e) => {
                        error!("Unable to deliver the feedback error reply: {}", e);
                        FeedbackOutcome::Undelivered
                    }
                }
            }
        }
    }

    async fn rate(&self, event: &ActionEvent, rating: Rating) -> Result<FeedbackOutcome, FeedbackError> {
        let action = event.first_action().ok_or(FeedbackError::MissingAction)?;
        let message_id: i64 = action.value
            .trim()
            .parse()
            .map_err(|_| FeedbackError::InvalidMessageId(action.value.clone()))?;

        self.qa.send_rating(message_id, rating).await?;
        info!("Recorded rating {} for message {}", rating.value(), message_id);

        let (payload, outcome) = Self::follow_up(event, rating);
        self.replies.reply(&event.response_url, &payload).await?;
        Ok(outcome)
    }

    fn follow_up(event: &ActionEvent, rating: Rating) -> (SlackPayload, FeedbackOutcome) {
        let is_private = event.container.is_ephemeral;
        let blocks = &event.message;
        if blocks.blocks.len() <= SOURCES_BLOCK {
            debug!("Rated message has {} blocks, sending a plain thank-you", blocks.blocks.len());
            return (rating_thanks_payload(rating, is_private), FeedbackOutcome::Acknowledged);
        }

        let question = blocks.block_text(QUESTION_BLOCK).unwrap_or_default();
        let answer = blocks.block_text(ANSWER_BLOCK).unwrap_or_default();
        let sources = blocks.block_text(SOURCES_BLOCK).unwrap_or_default();
        (
            rated_answer_payload(question, answer, sources, rating, is_private),
            FeedbackOutcome::Rated,
        )
    }
}
