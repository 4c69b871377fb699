use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{BotError, Result};

/// A Messenger user, keyed externally by their Facebook id.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub facebook_id: i64,
    pub profile_pic_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// First name if one is stored and non-empty.
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// Profile fields as retrieved from the Graph API. All optional: a failed or
/// partial lookup still lets the dispatch proceed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAttributes {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_pic_url: Option<String>,
}

/// Category of a canned message, persisted as an integer discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Fallback,
}

impl Category {
    pub fn as_i32(self) -> i32 {
        match self {
            Category::Fallback => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Fallback => "fallback",
        }
    }
}

impl TryFrom<i32> for Category {
    type Error = BotError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Category::Fallback),
            other => Err(BotError::UnknownCategory(other)),
        }
    }
}

/// A tappable canned response option shown under a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub content_type: String,
    pub title: String,
    pub payload: String,
}

impl QuickReply {
    /// Text quick reply, the only content type this bot sends.
    pub fn text(title: &str, payload: &str) -> Self {
        QuickReply {
            content_type: "text".to_string(),
            title: title.to_string(),
            payload: payload.to_string(),
        }
    }
}

/// A Messenger button attached to a canned message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// An administered message template, read by category at dispatch time.
#[derive(Debug, Clone)]
pub struct CannedMessage {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub body: String,
    pub quick_replies: Vec<QuickReply>,
    pub buttons: Vec<Button>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a canned message. Administration happens out of band
/// (migrations, seeds); the store still refuses blank templates.
#[derive(Debug, Clone)]
pub struct NewCannedMessage {
    pub name: String,
    pub category: Category,
    pub body: String,
    pub quick_replies: Vec<QuickReply>,
    pub buttons: Vec<Button>,
}

impl NewCannedMessage {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BotError::InvalidCannedMessage("name must not be empty".into()));
        }
        if self.body.trim().is_empty() {
            return Err(BotError::InvalidCannedMessage("body must not be empty".into()));
        }
        Ok(())
    }
}

/// One inbound webhook message event, alive for a single dispatch.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub sender_id: i64,
    pub recipient_id: i64,
    /// Epoch milliseconds as sent by the platform.
    pub timestamp: i64,
    pub text: String,
    pub quick_reply_payload: Option<String>,
    pub mid: Option<String>,
    pub seq: Option<i64>,
}

/// Outgoing payload handed to the delivery client. `quick_replies` is dropped
/// from the JSON entirely when there are none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<QuickReply>>,
}

impl OutgoingMessage {
    pub fn text_only(text: impl Into<String>) -> Self {
        OutgoingMessage { text: text.into(), quick_replies: None }
    }

    pub fn with_quick_replies(text: impl Into<String>, quick_replies: Vec<QuickReply>) -> Self {
        OutgoingMessage {
            text: text.into(),
            quick_replies: if quick_replies.is_empty() { None } else { Some(quick_replies) },
        }
    }
}
