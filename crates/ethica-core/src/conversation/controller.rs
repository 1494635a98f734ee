//! Chat controller: the command/dispatch facade over the conversation core.
//!
//! The presentation layer only calls these entry points and renders what
//! they return (or what the event bus reports). It never holds
//! orchestration state of its own.

use std::sync::Arc;

use ethica_types::chat::{ConversationId, SavedConversation};
use ethica_types::error::{ChatError, GatewayError, ValidationError};
use ethica_types::event::{ConversationEvent, ExchangeState};
use ethica_types::parameters::ParameterSet;
use ethica_types::status::ServiceStatus;
use tokio::sync::broadcast;

use crate::conversation::affordance::{InputAffordances, InputSource};
use crate::conversation::orchestrator::{ExchangeOutcome, RequestOrchestrator};
use crate::conversation::parameters::ParameterControls;
use crate::conversation::persistence::PersistenceCoordinator;
use crate::conversation::session::SessionState;
use crate::event::EventBus;
use crate::gateway::Gateway;

/// Owns one conversation session and everything that drives it.
pub struct ChatController<G: Gateway> {
    session: SessionState,
    parameters: ParameterControls,
    affordances: InputAffordances,
    orchestrator: RequestOrchestrator<G>,
    persistence: PersistenceCoordinator<G>,
    events: EventBus,
}

impl<G: Gateway> ChatController<G> {
    /// A controller with an empty session and controls seeded from `parameters`.
    pub fn new(gateway: Arc<G>, parameters: ParameterSet) -> Self {
        let events = EventBus::default();
        Self {
            session: SessionState::new(),
            parameters: ParameterControls::from_parameters(parameters),
            affordances: InputAffordances::new(),
            orchestrator: RequestOrchestrator::new(Arc::clone(&gateway), events.clone()),
            persistence: PersistenceCoordinator::new(gateway, events.clone()),
            events,
        }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    /// Run one exchange. See [`RequestOrchestrator::submit`].
    pub async fn submit(
        &mut self,
        source: InputSource,
        text: &str,
    ) -> Result<ExchangeOutcome, ValidationError> {
        let parameters = self.parameters.build_request_parameters();
        self.orchestrator
            .submit(
                &mut self.session,
                &mut self.affordances,
                parameters,
                source,
                text,
            )
            .await
    }

    /// Submit to the live follow-up if there is one, else the primary input.
    pub async fn submit_next(&mut self, text: &str) -> Result<ExchangeOutcome, ValidationError> {
        let source = match self.affordances.follow_up() {
            Some(id) => InputSource::FollowUp(id),
            None => InputSource::Primary,
        };
        self.submit(source, text).await
    }

    pub async fn save(&mut self, name: &str) -> Result<SavedConversation, ChatError> {
        self.persistence.save(&mut self.session, name).await
    }

    pub async fn list_saved(&self) -> Result<Vec<SavedConversation>, GatewayError> {
        self.persistence.list_saved().await
    }

    pub async fn load(&mut self, id: &ConversationId) -> Result<usize, GatewayError> {
        self.persistence
            .load(&mut self.session, &mut self.affordances, id)
            .await
    }

    pub async fn clear(&mut self) -> Result<(), GatewayError> {
        self.persistence
            .clear(&mut self.session, &mut self.affordances)
            .await
    }

    pub async fn new_conversation(&mut self) -> Result<bool, GatewayError> {
        self.persistence
            .new_conversation(&mut self.session, &mut self.affordances)
            .await
    }

    pub async fn delete_saved(&mut self, id: &ConversationId) -> Result<(), GatewayError> {
        self.persistence.delete_saved(&mut self.session, id).await
    }

    pub async fn status(&self) -> Result<ServiceStatus, GatewayError> {
        self.persistence.status().await
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn parameters(&self) -> &ParameterControls {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterControls {
        &mut self.parameters
    }

    pub fn affordances(&self) -> &InputAffordances {
        &self.affordances
    }

    pub fn exchange_state(&self) -> ExchangeState {
        self.orchestrator.state()
    }
}
