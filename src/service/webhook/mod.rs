//! HTTP surface for LINE webhook deliveries.
//!
//! Exposes:
//! - `POST {webhook_path}`: verify, parse, classify, acknowledge
//! - `GET /health`: health check
//!
//! The webhook always acknowledges a correctly signed delivery with `200 OK`,
//! whatever the classification or send outcome, since LINE expects a prompt
//! success response.

pub mod signature;

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::{debug, info, instrument, warn};

use crate::{
    base::{
        config::Config,
        types::{EventPolicy, SharedKeywords, Void, WebhookBody, WebhookEvent},
    },
    interaction::{self, message_event::ReplyTasks},
    service::chat::ChatClient,
};

/// Path of the health check.
pub const HEALTH_PATH: &str = "/health";

/// Shared state for the webhook handlers.
///
/// Trivially cloneable; apart from the reply task set, everything inside is read-only.
#[derive(Clone)]
pub struct WebhookState {
    /// Keyword lists consulted for every message.
    pub keywords: SharedKeywords,
    /// Client used to send replies.
    pub chat: ChatClient,
    /// Which events of a batch are answered.
    pub policy: EventPolicy,
    /// Channel secret used to check signatures; `None` disables the check.
    pub channel_secret: Option<Arc<str>>,
    /// Reply sends still running, awaited on shutdown.
    pub tasks: ReplyTasks,
}

impl WebhookState {
    pub fn new(config: &Config, chat: ChatClient) -> Self {
        let channel_secret = config.verify_signature.then(|| Arc::from(config.line_channel_secret.as_str()));

        Self {
            keywords: Arc::new(config.keywords.clone()),
            chat,
            policy: config.event_policy,
            channel_secret,
            tasks: ReplyTasks::default(),
        }
    }
}

/// Builds the router with the webhook mounted at `webhook_path`.
pub fn router(webhook_path: &str, state: WebhookState) -> Router {
    Router::new()
        .route(webhook_path, post(handle_webhook))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

/// Binds `listen_address` and serves until Ctrl-C, then waits for reply
/// sends that were already accepted.
pub async fn serve(config: &Config, state: WebhookState) -> Void {
    let tasks = state.tasks.clone();
    let app = router(&config.webhook_path, state);

    let listener = TcpListener::bind(&config.listen_address).await.map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", config.listen_address, e))?;

    info!("Listening for webhooks on {}{}", listener.local_addr()?, config.webhook_path);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    if !tasks.is_empty() {
        info!("Waiting for {} in-flight reply tasks ...", tasks.len());
    }

    let delivered = tasks.drain().await;

    info!("Webhook server stopped ({} replies delivered during shutdown).", delivered);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}

/// Parses a delivery body leniently.
///
/// An unparseable body yields no events; an unparseable event is dropped and
/// the rest of the batch is kept.
pub fn parse_events(body: &[u8]) -> Vec<WebhookEvent> {
    let body: WebhookBody = match serde_json::from_slice(body) {
        Ok(body) => body,
        Err(err) => {
            warn!("Ignoring malformed webhook body: {}", err);
            return Vec::new();
        }
    };

    body.events
        .into_iter()
        .filter_map(|raw| match serde_json::from_value(raw) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!("Ignoring malformed event: {}", err);
                None
            }
        })
        .collect()
}

// Handlers.

async fn health() -> &'static str {
    "OK"
}

#[instrument(skip_all)]
async fn handle_webhook(State(state): State<WebhookState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    if let Some(secret) = &state.channel_secret {
        let signature = headers.get(signature::SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

        let Some(signature) = signature else {
            warn!("Rejecting delivery without a signature.");
            return StatusCode::UNAUTHORIZED;
        };

        if !signature::verify_signature(secret, &body, signature) {
            warn!("Rejecting delivery with an invalid signature.");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let events = parse_events(&body);

    if events.is_empty() {
        info!("Received empty event batch.");
        return StatusCode::OK;
    }

    info!("Received {} events ...", events.len());

    // Sending continues in the background; the delivery is acknowledged now.
    if interaction::message_event::handle_events(events, state.policy, state.keywords.clone(), state.chat.clone(), &state.tasks) {
        debug!("Reply sends scheduled.");
    }

    StatusCode::OK
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_body_yields_no_events() {
        assert!(parse_events(b"not json").is_empty());
        assert!(parse_events(b"{}").is_empty());
        assert!(parse_events(br#"{"events": []}"#).is_empty());
    }

    #[test]
    fn malformed_event_does_not_drop_the_batch() {
        let body = json!({
            "destination": "U0",
            "events": [
                { "type": "message", "replyToken": "t1" },
                { "type": "message", "replyToken": "t2", "message": { "type": "text", "text": "hi" } },
                { "type": "unfollow" }
            ]
        });

        let events = parse_events(body.to_string().as_bytes());

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], WebhookEvent::Message { reply_token: Some(t), .. } if t == "t2"));
        assert_eq!(events[1], WebhookEvent::Other);
    }
}
