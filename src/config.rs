//! Process-wide configuration loaded from the environment.

use std::net::SocketAddr;

use crate::error::{BotError, Result};

/// Default Graph API base; override with `GRAPH_API_URL` (tests point it at a
/// local mock server).
pub const DEFAULT_GRAPH_API_URL: &str = "https://graph.facebook.com";

/// Everything the server needs from the environment, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Page access token used for both Graph API lookups and Send API calls.
    pub access_token: String,
    /// Token Facebook echoes back during webhook subscription.
    pub verify_token: String,
    pub graph_api_url: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = require("DATABASE_URL")?;
        let access_token = require("FB_ACCESS_TOKEN")?;
        let verify_token = require("VERIFY_TOKEN")?;

        let graph_api_url = std::env::var("GRAPH_API_URL")
            .unwrap_or_else(|_| DEFAULT_GRAPH_API_URL.to_string());

        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| BotError::Config(format!("PORT is not a valid port: {raw}")))?,
            Err(_) => 3000,
        };

        Ok(Config {
            database_url,
            access_token,
            verify_token,
            graph_api_url,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| BotError::Config(format!("{name} must be set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_is_a_config_error() {
        std::env::remove_var("DATABASE_URL");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
    }
}
