use super::{ unique_links, QaClient, QaConfig, QueryResponse, Rating, NO_ANSWER_FOUND };
use crate::error::QaError;
use crate::models::chat::HistoryItem;
use async_trait::async_trait;
use log::{ debug, error };
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use std::time::Duration;

pub struct MendableClient {
    http: HttpClient,
    config: QaConfig,
}

#[derive(Serialize)]
struct NewConversationRequest<'a> {
    api_key: &'a str,
}

#[derive(Deserialize)]
struct NewConversationResponse {
    conversation_id: i64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    api_key: &'a str,
    question: &'a str,
    history: &'a [HistoryItem],
    #[serde(rename = "shouldStream")]
    should_stream: bool,
    conversation_id: i64,
}

#[derive(Deserialize, Default)]
struct ChatAnswer {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ChatSource {
    #[serde(default)]
    link: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    answer: ChatAnswer,
    message_id: i64,
    #[serde(default)]
    sources: Vec<ChatSource>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Serialize)]
struct RatingRequest<'a> {
    api_key: &'a str,
    message_id: i64,
    rating_value: i8,
}

impl MendableClient {
    pub fn new(config: QaConfig, http: HttpClient) -> Self {
        Self { http, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration
    ) -> Result<String, QaError> {
        let url = self.endpoint(path);
        let resp = self.http
            .post(&url)
            .json(body)
            .timeout(timeout)
            .send().await
            .map_err(|e| {
                error!("Request to {} failed: {}", url, e);
                e
            })?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            error!("{} returned status {}: {}", url, status, text);
            return Err(QaError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait]
impl QaClient for MendableClient {
    async fn create_conversation(&self) -> Result<i64, QaError> {
        let body = NewConversationRequest { api_key: &self.config.api_key };
        let text = self.post("newConversation", &body, self.config.create_timeout).await?;
        let parsed: NewConversationResponse = serde_json::from_str(&text)?;
        debug!("Conversation ID: {}", parsed.conversation_id);
        Ok(parsed.conversation_id)
    }

    async fn ask(
        &self,
        question: &str,
        history: &[HistoryItem],
        conversation_id: i64
    ) -> Result<QueryResponse, QaError> {
        debug!("Query question: {}", question);
        let body = ChatRequest {
            api_key: &self.config.api_key,
            question,
            history,
            should_stream: false,
            conversation_id,
        };
        let text = self.post("mendableChat", &body, self.config.ask_timeout).await?;
        let parsed: ChatResponse = serde_json::from_str(&text)?;

        let links = unique_links(
            parsed.sources.iter().map(|s| s.link.as_str()),
            &self.config.docs_root_url
        );
        let answer = if parsed.answer.text.trim().is_empty() {
            NO_ANSWER_FOUND.to_string()
        } else {
            parsed.answer.text
        };

        Ok(QueryResponse {
            conversation_id,
            message_id: parsed.message_id,
            question: question.to_string(),
            answer,
            links,
            confidence: parsed.confidence,
        })
    }

    async fn send_rating(&self, message_id: i64, rating: Rating) -> Result<(), QaError> {
        let body = RatingRequest {
            api_key: &self.config.api_key,
            message_id,
            rating_value: rating.value(),
        };
        self.post("rateMessage", &body, self.config.rating_timeout).await?;
        Ok(())
    }
}
