use async_trait::async_trait;
use sqlx::PgPool;

use crate::bot_logic::models::{User, UserAttributes};
use crate::error::Result;

/// Persistent user records keyed by Facebook id. `find_or_create` must stay
/// idempotent and safe under concurrent calls for the same key.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_or_create(&self, facebook_id: i64, attributes: UserAttributes) -> Result<User>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        PgUserStore { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    /// Single-statement upsert; the unique index on `facebook_id` guarantees
    /// one row per sender even when events race. Retrieved profile fields
    /// refresh the record, but never overwrite stored values with NULL.
    async fn find_or_create(&self, facebook_id: i64, attributes: UserAttributes) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (facebook_id, first_name, last_name, profile_pic_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (facebook_id) DO UPDATE SET
                first_name = COALESCE(EXCLUDED.first_name, users.first_name),
                last_name = COALESCE(EXCLUDED.last_name, users.last_name),
                profile_pic_url = COALESCE(EXCLUDED.profile_pic_url, users.profile_pic_url),
                updated_at = now()
            RETURNING id, first_name, last_name, facebook_id, profile_pic_url,
                      created_at, updated_at
            "#,
        )
        .bind(facebook_id)
        .bind(&attributes.first_name)
        .bind(&attributes.last_name)
        .bind(&attributes.profile_pic_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
