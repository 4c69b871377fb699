use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::bot_logic::models::OutgoingMessage;
use crate::error::{BotError, Result};

/// Posts one outgoing payload to a recipient. One call per handled event.
#[async_trait]
pub trait MessageDelivery: Send + Sync {
    async fn deliver(&self, recipient_id: i64, message: &OutgoingMessage) -> Result<()>;
}

/// Send API client. The page access token rides along as a query parameter.
#[derive(Clone)]
pub struct SendApi {
    client: Client,
    base_url: String,
    access_token: String,
}

#[derive(Serialize)]
struct SendPayload<'a> {
    recipient: Recipient,
    message: &'a OutgoingMessage,
}

#[derive(Serialize)]
struct Recipient {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    recipient_id: Option<String>,
    message_id: Option<String>,
}

impl SendApi {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        SendApi {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }
}

#[async_trait]
impl MessageDelivery for SendApi {
    async fn deliver(&self, recipient_id: i64, message: &OutgoingMessage) -> Result<()> {
        let url = format!("{}/me/messages", self.base_url);
        let payload = SendPayload {
            recipient: Recipient { id: recipient_id.to_string() },
            message,
        };

        let response = self
            .client
            .post(&url)
            .query(&[("access_token", self.access_token.as_str())])
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, %body, "send api rejected the message");
            return Err(BotError::Api { status, body });
        }

        let sent: SendResponse = response.json().await?;
        debug!(recipient = ?sent.recipient_id, message_id = ?sent.message_id, "message delivered");
        Ok(())
    }
}
