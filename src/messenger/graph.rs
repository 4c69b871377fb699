use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::bot_logic::models::UserAttributes;
use crate::error::{BotError, Result};

/// Retrieves profile fields for a Facebook user id. The handler treats this
/// as best-effort; implementations report failures, they don't hide them.
#[async_trait]
pub trait UserProfileSource: Send + Sync {
    async fn retrieve(&self, facebook_id: i64) -> Result<UserAttributes>;
}

/// Graph API client for user-field lookups.
#[derive(Clone)]
pub struct GraphApi {
    client: Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    first_name: Option<String>,
    last_name: Option<String>,
    profile_pic: Option<String>,
}

impl GraphApi {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        GraphApi {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }
}

#[async_trait]
impl UserProfileSource for GraphApi {
    async fn retrieve(&self, facebook_id: i64) -> Result<UserAttributes> {
        let url = format!("{}/{}", self.base_url, facebook_id);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("fields", "first_name,last_name,profile_pic"),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Api { status, body });
        }

        let profile: ProfileResponse = response.json().await?;
        debug!(facebook_id, "retrieved user profile");

        Ok(UserAttributes {
            first_name: profile.first_name,
            last_name: profile.last_name,
            profile_pic_url: profile.profile_pic,
        })
    }
}
