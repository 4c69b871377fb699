//! Error types for the bot backend.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("facebook api request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("facebook api error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),

    #[error("webhook verification failed")]
    WebhookVerificationFailed,

    #[error("invalid canned message: {0}")]
    InvalidCannedMessage(String),

    #[error("unknown message category: {0}")]
    UnknownCategory(i32),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;
