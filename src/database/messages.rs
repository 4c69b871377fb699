use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::bot_logic::models::{Button, CannedMessage, Category, NewCannedMessage, QuickReply};
use crate::error::Result;

/// Read access to administered message templates, keyed by category. The
/// handler never writes through this trait.
#[async_trait]
pub trait CannedMessageStore: Send + Sync {
    async fn find_by_category(&self, category: Category) -> Result<Option<CannedMessage>>;
}

pub struct PgCannedMessageStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct CannedMessageRow {
    id: i64,
    name: String,
    category: i32,
    body: String,
    quick_replies: Json<Vec<QuickReply>>,
    buttons: Json<Vec<Button>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CannedMessageRow> for CannedMessage {
    type Error = crate::error::BotError;

    fn try_from(row: CannedMessageRow) -> Result<CannedMessage> {
        Ok(CannedMessage {
            id: row.id,
            name: row.name,
            category: Category::try_from(row.category)?,
            body: row.body,
            quick_replies: row.quick_replies.0,
            buttons: row.buttons.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl PgCannedMessageStore {
    pub fn new(pool: PgPool) -> Self {
        PgCannedMessageStore { pool }
    }

    /// Write path for out-of-band administration and seeds. Name and body must
    /// be non-empty.
    pub async fn insert(&self, message: NewCannedMessage) -> Result<CannedMessage> {
        message.validate()?;

        let row = sqlx::query_as::<_, CannedMessageRow>(
            r#"
            INSERT INTO facebook_messages (name, category, body, quick_replies, buttons)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, category, body, quick_replies, buttons,
                      created_at, updated_at
            "#,
        )
        .bind(&message.name)
        .bind(message.category.as_i32())
        .bind(&message.body)
        .bind(Json(&message.quick_replies))
        .bind(Json(&message.buttons))
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }
}

#[async_trait]
impl CannedMessageStore for PgCannedMessageStore {
    async fn find_by_category(&self, category: Category) -> Result<Option<CannedMessage>> {
        let row = sqlx::query_as::<_, CannedMessageRow>(
            r#"
            SELECT id, name, category, body, quick_replies, buttons,
                   created_at, updated_at
            FROM facebook_messages
            WHERE category = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(category.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CannedMessage::try_from).transpose()
    }
}
