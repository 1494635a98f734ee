//! Persistence coordinator: save, list, load, delete and clear flows.
//!
//! Every flow either fully applies its result to the session or leaves the
//! session exactly as it was. Failures are returned to the caller for a
//! standalone notification; they never produce transcript entries.

use std::sync::Arc;

use chrono::Utc;
use ethica_types::chat::{ConversationId, SaveConversationRequest, SavedConversation};
use ethica_types::error::{ChatError, GatewayError, ValidationError};
use ethica_types::event::ConversationEvent;
use ethica_types::status::ServiceStatus;
use tracing::{info, warn};

use crate::conversation::affordance::InputAffordances;
use crate::conversation::session::SessionState;
use crate::event::EventBus;
use crate::gateway::Gateway;

/// Reconciles the in-memory session with the remote conversation store.
pub struct PersistenceCoordinator<G: Gateway> {
    gateway: Arc<G>,
    events: EventBus,
}

impl<G: Gateway> PersistenceCoordinator<G> {
    pub fn new(gateway: Arc<G>, events: EventBus) -> Self {
        Self { gateway, events }
    }

    /// Store the current transcript under `name`.
    ///
    /// The transcript is snapshotted before the call; on success the
    /// returned id becomes the session identity.
    pub async fn save(
        &self,
        session: &mut SessionState,
        name: &str,
    ) -> Result<SavedConversation, ChatError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if session.is_empty() {
            return Err(ValidationError::EmptyTranscript.into());
        }

        let request = SaveConversationRequest {
            name: name.to_string(),
            messages: session.snapshot(),
        };
        let message_count = request.messages.len();

        let id = self
            .gateway
            .create_conversation(&request)
            .await
            .inspect_err(|e| warn!(error = %e, "save failed"))?;

        session.assign_id(id.clone());
        self.events
            .publish(ConversationEvent::SessionSaved { id: id.clone() });
        info!(conversation_id = %id, message_count, "conversation saved");

        Ok(SavedConversation {
            id,
            name: request.name,
            message_count: u32::try_from(message_count).unwrap_or(u32::MAX),
            timestamp: Some(Utc::now()),
        })
    }

    /// Summaries of every saved conversation, in the store's order.
    pub async fn list_saved(&self) -> Result<Vec<SavedConversation>, GatewayError> {
        self.gateway
            .list_conversations()
            .await
            .inspect_err(|e| warn!(error = %e, "listing saved conversations failed"))
    }

    /// Replace the session with the stored conversation `id`.
    ///
    /// Returns the number of restored messages.
    pub async fn load(
        &self,
        session: &mut SessionState,
        affordances: &mut InputAffordances,
        id: &ConversationId,
    ) -> Result<usize, GatewayError> {
        let detail = self
            .gateway
            .get_conversation(id)
            .await
            .inspect_err(|e| warn!(conversation_id = %id, error = %e, "load failed"))?;

        let restored_id = detail.id.unwrap_or_else(|| id.clone());
        let message_count = detail.messages.len();

        session.reset();
        session.replace(restored_id.clone(), detail.messages);
        if let Some(closed) = affordances.clear_all() {
            self.events
                .publish(ConversationEvent::FollowUpClosed { id: closed });
        }
        self.events.publish(ConversationEvent::SessionRestored {
            id: restored_id.clone(),
            message_count,
        });

        if message_count > 0 {
            let (follow_up, _) = affordances.open_follow_up();
            affordances.settle();
            self.events
                .publish(ConversationEvent::FollowUpOpened { id: follow_up });
        }

        info!(conversation_id = %restored_id, message_count, "conversation loaded");
        Ok(message_count)
    }

    /// Clear the backend's view, then the local session.
    ///
    /// A failed call leaves the transcript and affordances untouched.
    pub async fn clear(
        &self,
        session: &mut SessionState,
        affordances: &mut InputAffordances,
    ) -> Result<(), GatewayError> {
        self.gateway
            .clear()
            .await
            .inspect_err(|e| warn!(error = %e, "clear failed"))?;

        session.reset();
        if let Some(closed) = affordances.clear_all() {
            self.events
                .publish(ConversationEvent::FollowUpClosed { id: closed });
        }
        self.events.publish(ConversationEvent::SessionReset);
        info!("conversation cleared");
        Ok(())
    }

    /// Start over. An empty session is left alone and yields `false`.
    pub async fn new_conversation(
        &self,
        session: &mut SessionState,
        affordances: &mut InputAffordances,
    ) -> Result<bool, GatewayError> {
        if session.is_empty() {
            return Ok(false);
        }
        self.clear(session, affordances).await?;
        Ok(true)
    }

    /// Remove a stored conversation.
    ///
    /// If it is the one currently loaded, the session keeps its transcript
    /// but loses its identity.
    pub async fn delete_saved(
        &self,
        session: &mut SessionState,
        id: &ConversationId,
    ) -> Result<(), GatewayError> {
        self.gateway
            .delete_conversation(id)
            .await
            .inspect_err(|e| warn!(conversation_id = %id, error = %e, "delete failed"))?;

        if session.id() == Some(id) {
            session.forget_id();
        }
        self.events
            .publish(ConversationEvent::SavedConversationDeleted { id: id.clone() });
        info!(conversation_id = %id, "saved conversation deleted");
        Ok(())
    }

    pub async fn status(&self) -> Result<ServiceStatus, GatewayError> {
        self.gateway.status().await
    }
}
