pub mod intents;
pub mod mapper;
pub mod models;

pub use intents::{Intent, IntentClassifier, KeywordClassifier};
pub use mapper::IntentMapper;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::bot_logic::models::{IncomingMessage, UserAttributes};
use crate::database::UserStore;
use crate::error::Result;
use crate::messenger::{MessageDelivery, UserProfileSource};

/// Orchestrates one inbound message event: resolve the user, classify the
/// text, build a response, deliver it. All collaborators are injected, so
/// tests swap any of them without touching global state.
pub struct MessageHandler {
    users: Arc<dyn UserStore>,
    profiles: Arc<dyn UserProfileSource>,
    classifier: Arc<dyn IntentClassifier>,
    mapper: IntentMapper,
    delivery: Arc<dyn MessageDelivery>,
}

impl MessageHandler {
    pub fn new(
        users: Arc<dyn UserStore>,
        profiles: Arc<dyn UserProfileSource>,
        classifier: Arc<dyn IntentClassifier>,
        mapper: IntentMapper,
        delivery: Arc<dyn MessageDelivery>,
    ) -> Self {
        MessageHandler { users, profiles, classifier, mapper, delivery }
    }

    /// One delivery per handled event; at most one user upsert. User
    /// resolution is unconditional, it does not depend on the classifier
    /// outcome or on any quick-reply payload.
    pub async fn handle(&self, message: IncomingMessage) -> Result<()> {
        let attributes = match self.profiles.retrieve(message.sender_id).await {
            Ok(attributes) => attributes,
            Err(e) => {
                warn!(sender_id = message.sender_id, error = %e,
                      "profile lookup failed, continuing with an unnamed user");
                UserAttributes::default()
            }
        };

        let user = self.users.find_or_create(message.sender_id, attributes).await?;

        if let Some(payload) = message.quick_reply_payload.as_deref() {
            debug!(sender_id = message.sender_id, payload, "quick reply payload received");
        }

        let intent = self.classifier.classify(&message.text);
        info!(
            sender_id = message.sender_id,
            intent = intent.map(Intent::as_str).unwrap_or("none"),
            "classified inbound message"
        );

        let outgoing = self.mapper.map_intent_to_message(intent, &user).await?;
        self.delivery.deliver(message.sender_id, &outgoing).await
    }
}
