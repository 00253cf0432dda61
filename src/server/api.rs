use crate::models::slack::{ ActionEvent, SlashCommandEvent };
use crate::slack::messages::help_payload;
use crate::slack::reply::ReplyDispatcher;
use crate::slack::signature::verify_request;
use crate::workflow::feedback::rating_for_action;
use crate::workflow::{ AskRequest, AskWorkflow, FeedbackWorkflow, SlackCommand };
use axum::{
    body::Bytes,
    extract::State,
    http::{ HeaderMap, StatusCode },
    response::{ IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use governor::{ DefaultDirectRateLimiter, Quota, RateLimiter };
use log::{ debug, error, info, warn };
use serde::Serialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tower_http::cors::{ Any, CorsLayer };

#[derive(Clone)]
pub struct AppState {
    pub signing_secret: Arc<str>,
    pub ask: Arc<AskWorkflow>,
    pub feedback: Arc<FeedbackWorkflow>,
    pub replies: Arc<dyn ReplyDispatcher>,
    pub limiter: Arc<DefaultDirectRateLimiter>,
    pub version: &'static str,
}

impl AppState {
    pub fn new(
        signing_secret: impl Into<Arc<str>>,
        ask: Arc<AskWorkflow>,
        feedback: Arc<FeedbackWorkflow>,
        replies: Arc<dyn ReplyDispatcher>,
        requests_per_second: NonZeroU32
    ) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            ask,
            feedback,
            replies,
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(requests_per_second))),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Only authenticated requests count against the rate limit.
    fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), StatusCode> {
        verify_request(&self.signing_secret, headers, body).map_err(|e| {
            warn!("Rejected Slack request: {}", e);
            StatusCode::FORBIDDEN
        })?;
        if self.limiter.check().is_err() {
            warn!("Rate limit exceeded, rejecting Slack request");
            return Err(StatusCode::TOO_MANY_REQUESTS);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/slack", post(slash_command_handler))
        .route("/api/v1/slack/actions", post(actions_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse { status: "OK", version: state.version })
}

async fn slash_command_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes
) -> Response {
    if let Err(code) = state.verify(&headers, &body) {
        return code.into_response();
    }

    let event = SlashCommandEvent::from_form(&body);
    let command = SlackCommand::resolve(&event.text);
    info!("Slash command '{}' from user {} in channel {}", command, event.user_id, event.channel_id);

    if command == SlackCommand::Help {
        return Json(help_payload()).into_response();
    }

    let ack = state.replies.reply_ack(&event.response_url);
    if let Err(e) = &ack {
        error!("Unable to acknowledge command from {}: {}", event.user_id, e);
    }

    state.ask.spawn(AskRequest {
        user_id: event.user_id,
        channel_id: event.channel_id,
        text: event.text,
        response_url: event.response_url,
        is_private: command.is_private(),
    });

    match ack {
        Ok(payload) => Json(payload).into_response(),
        Err(_) => StatusCode::OK.into_response(),
    }
}

async fn actions_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes
) -> Response {
    if let Err(code) = state.verify(&headers, &body) {
        return code.into_response();
    }

    let event = match ActionEvent::from_form(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!("Unable to decode interaction payload: {}", e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let Some(action_id) = event.first_action().map(|a| a.action_id.clone()) else {
        debug!("Interaction of type '{}' carries no action", event.kind);
        return StatusCode::OK.into_response();
    };

    match rating_for_action(&action_id) {
        Some(rating) => {
            info!("Feedback action '{}' received", action_id);
            state.feedback.spawn(event, rating);
        }
        None => debug!("Ignoring unknown action '{}'", action_id),
    }
    StatusCode::OK.into_response()
}
