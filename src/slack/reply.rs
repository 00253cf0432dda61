use super::blocks::SlackPayload;
use super::messages::{ error_payload, wait_payload };
use crate::cli::Args;
use crate::error::ReplyError;
use async_trait::async_trait;
use log::{ debug, error, warn };
use reqwest::header::CONTENT_TYPE;
use reqwest::Client as HttpClient;
use std::time::Duration;

/// Delivers messages to a Slack `response_url`.
#[async_trait]
pub trait ReplyDispatcher: Send + Sync {
    /// Posts `payload`, retrying transport errors and non-2xx responses.
    async fn reply(&self, response_url: &str, payload: &SlackPayload) -> Result<(), ReplyError>;

    /// Builds the "please wait" acknowledgment that is returned inline to
    /// Slack within its three second window. Nothing is retried here.
    fn reply_ack(&self, response_url: &str) -> Result<SlackPayload, ReplyError>;

    /// Posts the fixed apology message.
    async fn reply_error(&self, response_url: &str, is_private: bool) -> Result<(), ReplyError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

#[derive(Clone, Copy, Debug)]
pub struct ReplyConfig {
    pub answer: RetryPolicy,
    pub error: RetryPolicy,
    pub request_timeout: Duration,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            answer: RetryPolicy { attempts: 3, delay: Duration::from_secs(3) },
            error: RetryPolicy { attempts: 5, delay: Duration::from_secs(2) },
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&Args> for ReplyConfig {
    fn from(args: &Args) -> Self {
        Self {
            answer: RetryPolicy {
                attempts: args.reply_attempts,
                delay: Duration::from_secs(args.reply_delay_secs),
            },
            error: RetryPolicy {
                attempts: args.error_reply_attempts,
                delay: Duration::from_secs(args.error_reply_delay_secs),
            },
            ..Self::default()
        }
    }
}

pub struct HttpReplyDispatcher {
    http: HttpClient,
    config: ReplyConfig,
}

impl HttpReplyDispatcher {
    pub fn new(http: HttpClient, config: ReplyConfig) -> Self {
        Self { http, config }
    }

    async fn post_once(&self, response_url: &str, body: &[u8]) -> Result<(), ReplyError> {
        let resp = self.http
            .post(response_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .timeout(self.config.request_timeout)
            .send().await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ReplyError::Status { status: status.as_u16(), body })
    }

    /// Only the error of the final attempt is returned.
    async fn post_with_retry(
        &self,
        response_url: &str,
        body: &[u8],
        policy: RetryPolicy
    ) -> Result<(), ReplyError> {
        let mut attempt = 1;
        loop {
            match self.post_once(response_url, body).await {
                Ok(()) => {
                    debug!("Reply delivered on attempt {}", attempt);
                    return Ok(());
                }
                Err(e) if attempt >= policy.attempts => {
                    error!("Reply failed after {} attempts: {}", attempt, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Reply attempt {}/{} failed: {}", attempt, policy.attempts, e);
                    attempt += 1;
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl ReplyDispatcher for HttpReplyDispatcher {
    async fn reply(&self, response_url: &str, payload: &SlackPayload) -> Result<(), ReplyError> {
        if response_url.is_empty() {
            return Err(ReplyError::EmptyResponseUrl);
        }
        let body = serde_json::to_vec(payload)?;
        self.post_with_retry(response_url, &body, self.config.answer).await
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
        let body = serde_json::to_vec(&error_payload(is_private))?;
        self.post_with_retry(response_url, &body, self.config.error).await
    }
}
