use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cellar_bot::bot_logic::{IntentMapper, KeywordClassifier, MessageHandler};
use cellar_bot::config::Config;
use cellar_bot::database::{PgCannedMessageStore, PgUserStore};
use cellar_bot::messenger::{self, AppState, GraphApi, SendApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = PgPool::connect(&config.database_url).await?;
    info!("database connected");

    let users = Arc::new(PgUserStore::new(pool.clone()));
    let canned = Arc::new(PgCannedMessageStore::new(pool.clone()));
    let profiles = Arc::new(GraphApi::new(&config.graph_api_url, &config.access_token));
    let delivery = Arc::new(SendApi::new(&config.graph_api_url, &config.access_token));
    let classifier = Arc::new(KeywordClassifier::new());

    let handler = MessageHandler::new(
        users,
        profiles,
        classifier,
        IntentMapper::new(canned),
        delivery,
    );

    let state = AppState {
        handler: Arc::new(handler),
        verify_token: config.verify_token.clone(),
    };

    let app = Router::new()
        .route(
            "/webhook",
            get(messenger::handle_verify_webhook).post(messenger::handle_receive_webhook),
        )
        .with_state(state);

    info!(addr = %config.bind_addr, "cellar-bot listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
