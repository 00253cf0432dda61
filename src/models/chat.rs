use crate::error::RecordError;
use serde::{ Deserialize, Serialize };
use std::collections::HashMap;

pub const FIELD_USER_ID: &str = "UserID";
pub const FIELD_CHANNEL_ID: &str = "ChannelID";
pub const FIELD_CONVERSATION_ID: &str = "ConversationID";
pub const FIELD_QUESTION: &str = "Question";
pub const FIELD_ANSWER: &str = "Answer";
pub const FIELD_HISTORY: &str = "History";
pub const FIELD_COUNTER: &str = "Counter";

/// One question/answer exchange, in the shape the Q&A provider expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub prompt: String,
    pub response: String,
}

impl HistoryItem {
    pub fn new(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), response: response.into() }
    }
}

/// Cached state of a user's conversation in one channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationRecord {
    pub user_id: String,
    pub channel_id: String,
    pub conversation_id: i64,
    pub last_question: String,
    pub last_answer: String,
    pub history: Vec<HistoryItem>,
    pub counter: u32,
}

impl ConversationRecord {
    /// Encodes the record as the string hash stored in the cache.
    pub fn to_fields(&self) -> Result<Vec<(String, String)>, RecordError> {
        let history = serde_json::to_string(&self.history)?;
        Ok(
            vec![
                (FIELD_USER_ID.to_string(), self.user_id.clone()),
                (FIELD_CHANNEL_ID.to_string(), self.channel_id.clone()),
                (FIELD_CONVERSATION_ID.to_string(), self.conversation_id.to_string()),
                (FIELD_QUESTION.to_string(), self.last_question.clone()),
                (FIELD_ANSWER.to_string(), self.last_answer.clone()),
                (FIELD_HISTORY.to_string(), history),
                (FIELD_COUNTER.to_string(), self.counter.to_string())
            ]
        )
    }

    /// Decodes a cached hash. This is the only place the string-typed
    /// numeric fields are parsed.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, RecordError> {
        let conversation_id = parse_number::<i64>(fields, FIELD_CONVERSATION_ID)?;
        let counter = parse_number::<u32>(fields, FIELD_COUNTER)?;

        // Records written before history was tracked have no History field.
        let history = match fields.get(FIELD_HISTORY) {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)?,
            _ => Vec::new(),
        };

        Ok(Self {
            user_id: fields.get(FIELD_USER_ID).cloned().unwrap_or_default(),
            channel_id: fields.get(FIELD_CHANNEL_ID).cloned().unwrap_or_default(),
            conversation_id,
            last_question: fields.get(FIELD_QUESTION).cloned().unwrap_or_default(),
            last_answer: fields.get(FIELD_ANSWER).cloned().unwrap_or_default(),
            history,
            counter,
        })
    }
}

fn parse_number<T>(fields: &HashMap<String, String>, field: &'static str) -> Result<T, RecordError>
    where T: std::str::FromStr<Err = std::num::ParseIntError>
{
    let raw = fields.get(field).ok_or(RecordError::MissingField(field))?;
    raw.trim().parse::<T>().map_err(|source| RecordError::InvalidNumber {
        field,
        value: raw.clone(),
        source,
    })
}
