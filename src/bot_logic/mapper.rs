use std::sync::Arc;

use tracing::warn;

use crate::bot_logic::intents::Intent;
use crate::bot_logic::models::{Category, OutgoingMessage, QuickReply, User};
use crate::database::CannedMessageStore;
use crate::error::Result;

/// Quick-reply payload a user taps to confirm account creation.
pub const CREATE_ACCOUNT_PAYLOAD: &str = "CREATE_ACCOUNT";

/// Served only if the fallback template is missing from the store.
const LAST_RESORT_FALLBACK: &str = "Sorry, I didn't quite catch that.";

/// Maps a resolved intent (plus user context) to the outgoing payload.
pub struct IntentMapper {
    canned: Arc<dyn CannedMessageStore>,
}

impl IntentMapper {
    pub fn new(canned: Arc<dyn CannedMessageStore>) -> Self {
        IntentMapper { canned }
    }

    pub async fn map_intent_to_message(
        &self,
        intent: Option<Intent>,
        user: &User,
    ) -> Result<OutgoingMessage> {
        match intent {
            Some(Intent::AddRed) => Ok(OutgoingMessage::text_only(invitation("red"))),
            Some(Intent::AddWhite) => Ok(OutgoingMessage::text_only(invitation("white"))),
            Some(Intent::CreateAccount) => Ok(OutgoingMessage::with_quick_replies(
                "Would you like to create your account with Charles d'Née?",
                vec![QuickReply::text("Yes please!", CREATE_ACCOUNT_PAYLOAD)],
            )),
            None => self.fallback(user).await,
        }
    }

    /// Unrecognized text gets the administered fallback template.
    async fn fallback(&self, user: &User) -> Result<OutgoingMessage> {
        match self.canned.find_by_category(Category::Fallback).await? {
            Some(canned) => Ok(OutgoingMessage::with_quick_replies(
                render(&canned.body, user),
                canned.quick_replies,
            )),
            None => {
                warn!(category = Category::Fallback.as_str(), "no canned message for category");
                Ok(OutgoingMessage::text_only(LAST_RESORT_FALLBACK))
            }
        }
    }
}

fn invitation(color: &str) -> String {
    format!("How lovely! Would you like to add a new bottle of {color} to your cellar?")
}

/// Canned bodies may address the user by `{first_name}`; the token renders
/// empty when no name is stored.
fn render(body: &str, user: &User) -> String {
    body.replace("{first_name}", user.first_name().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::bot_logic::models::CannedMessage;

    struct StaticCanned {
        fallback: Option<CannedMessage>,
    }

    #[async_trait]
    impl CannedMessageStore for StaticCanned {
        async fn find_by_category(&self, _category: Category) -> Result<Option<CannedMessage>> {
            Ok(self.fallback.clone())
        }
    }

    fn canned_fallback(body: &str) -> CannedMessage {
        let now = Utc::now();
        CannedMessage {
            id: 1,
            name: "default fallback".into(),
            category: Category::Fallback,
            body: body.into(),
            quick_replies: vec![],
            buttons: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn user(first_name: Option<&str>) -> User {
        let now = Utc::now();
        User {
            id: 1,
            first_name: first_name.map(String::from),
            last_name: None,
            facebook_id: 1234,
            profile_pic_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn mapper(fallback: Option<CannedMessage>) -> IntentMapper {
        IntentMapper::new(Arc::new(StaticCanned { fallback }))
    }

    #[tokio::test]
    async fn red_invitation_has_no_quick_replies() {
        let mapper = mapper(Some(canned_fallback("hm?")));
        let message = mapper
            .map_intent_to_message(Some(Intent::AddRed), &user(Some("Peter")))
            .await
            .unwrap();
        assert_eq!(
            message.text,
            "How lovely! Would you like to add a new bottle of red to your cellar?"
        );
        assert!(message.quick_replies.is_none());
    }

    #[tokio::test]
    async fn account_invitation_carries_the_confirm_quick_reply() {
        let mapper = mapper(Some(canned_fallback("hm?")));
        let message = mapper
            .map_intent_to_message(Some(Intent::CreateAccount), &user(None))
            .await
            .unwrap();
        let replies = message.quick_replies.unwrap();
        assert!(replies.contains(&QuickReply::text("Yes please!", CREATE_ACCOUNT_PAYLOAD)));
    }

    #[tokio::test]
    async fn unknown_intent_uses_the_stored_fallback() {
        let mapper = mapper(Some(canned_fallback("Hm {first_name}, tell me about wine instead?")));
        let message = mapper.map_intent_to_message(None, &user(Some("Peter"))).await.unwrap();
        assert_eq!(message.text, "Hm Peter, tell me about wine instead?");
        assert!(message.quick_replies.is_none());
    }

    #[tokio::test]
    async fn missing_fallback_row_still_produces_a_reply() {
        let mapper = mapper(None);
        let message = mapper.map_intent_to_message(None, &user(None)).await.unwrap();
        assert_eq!(message.text, LAST_RESORT_FALLBACK);
        assert!(message.quick_replies.is_none());
    }
}
