use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::bot_logic::models::IncomingMessage;
use crate::bot_logic::MessageHandler;

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<MessageHandler>,
    pub verify_token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: String,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: String,
    #[serde(rename = "hub.challenge")]
    pub challenge: String,
}

/// Webhook envelope as posted by the Messenger platform.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    pub id: Option<String>,
    pub time: Option<i64>,
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Deserialize)]
pub struct MessagingEvent {
    pub sender: Option<Party>,
    pub recipient: Option<Party>,
    pub timestamp: Option<i64>,
    pub message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
pub struct Party {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct EventMessage {
    pub mid: Option<String>,
    pub seq: Option<i64>,
    pub text: Option<String>,
    pub quick_reply: Option<EventQuickReply>,
}

#[derive(Debug, Deserialize)]
pub struct EventQuickReply {
    // The platform sends an explicit null payload on plain text messages.
    pub payload: Option<String>,
}

impl MessagingEvent {
    /// Extracts a dispatchable message, skipping delivery receipts, read
    /// events, and envelopes with malformed ids.
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        let message = self.message?;
        let sender = self.sender?;
        let recipient = self.recipient?;

        let quick_reply_payload = message.quick_reply.and_then(|q| q.payload);
        if message.text.is_none() && quick_reply_payload.is_none() {
            return None;
        }

        let sender_id = parse_id(&sender.id)?;
        let recipient_id = parse_id(&recipient.id)?;

        Some(IncomingMessage {
            sender_id,
            recipient_id,
            timestamp: self.timestamp.unwrap_or_default(),
            text: message.text.unwrap_or_default(),
            quick_reply_payload,
            mid: message.mid,
            seq: message.seq,
        })
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    match raw.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            warn!(id = raw, "non-numeric id in webhook envelope");
            None
        }
    }
}

/// GET /webhook: subscription verification challenge.
pub async fn handle_verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyQuery>,
) -> (StatusCode, String) {
    if params.mode == "subscribe" && params.verify_token == state.verify_token {
        (StatusCode::OK, params.challenge)
    } else {
        warn!("webhook verification failed: invalid mode or token");
        (StatusCode::FORBIDDEN, "verification failed".to_string())
    }
}

/// POST /webhook: one envelope may carry several messaging events; each gets
/// its own dispatch. Always acks with 200 so the platform does not re-post
/// events that merely failed downstream (failures are logged here).
pub async fn handle_receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> &'static str {
    for entry in payload.entry {
        for event in entry.messaging {
            let Some(incoming) = event.into_incoming() else {
                debug!("ignoring non-message event");
                continue;
            };
            if let Err(e) = state.handler.handle(incoming).await {
                error!(error = %e, "message dispatch failed");
            }
        }
    }
    "EVENT_RECEIVED"
}
