use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The fields were written but the key could not be given an expiration.
    /// The store removes the key before returning this.
    #[error("failed to set expiration on key {key}: {source}")]
    ExpireFailed {
        key: String,
        #[source]
        source: redis::RedisError,
    },

    #[error("unsupported cache type: {0}")]
    UnsupportedType(String),
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("cached record is missing field {0}")]
    MissingField(&'static str),

    #[error("cached field {field} holds a non-numeric value {value:?}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("cached history is not valid JSON: {0}")]
    History(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum QaError {
    #[error("request to the Q&A provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Q&A provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unable to decode Q&A provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("response URL is empty")]
    EmptyResponseUrl,

    #[error("reply request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reply endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unable to encode reply payload: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AskError {
    #[error("no question was provided after the command keyword")]
    EmptyQuestion,

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Qa(#[from] QaError),

    #[error(transparent)]
    Reply(#[from] ReplyError),
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("action event carries no action")]
    MissingAction,

    #[error("action value {0:?} is not a message id")]
    InvalidMessageId(String),

    #[error(transparent)]
    Qa(#[from] QaError),

    #[error(transparent)]
    Reply(#[from] ReplyError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing header {0}")]
    MissingHeader(&'static str),

    #[error("request timestamp is not a unix timestamp")]
    InvalidTimestamp,

    #[error("request timestamp is outside the accepted window")]
    StaleTimestamp,

    #[error("signature did not match")]
    Mismatch,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the required setting {0} is empty")]
    Missing(&'static str),

    #[error("invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
