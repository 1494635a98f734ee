//! Request orchestrator: drives one chat exchange at a time.
//!
//! An exchange appends the user's message, sends it with the prior context
//! and the current parameters, then appends either the assistant reply or a
//! local error notice. Whatever the outcome, including a cancelled request,
//! the affordances are settled and the orchestrator returns to `Idle`.

use std::sync::Arc;

use chrono::Utc;
use ethica_types::chat::{ChatRequest, MessageRole};
use ethica_types::error::{GatewayError, ValidationError};
use ethica_types::event::{ConversationEvent, ExchangeState, FollowUpId};
use ethica_types::parameters::ParameterSet;
use tracing::{debug, info, warn};

use crate::conversation::affordance::{InputAffordances, InputSource};
use crate::conversation::session::SessionState;
use crate::event::EventBus;
use crate::gateway::Gateway;

/// How a submitted exchange ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeOutcome {
    /// The reply was appended at `reply_index` and `follow_up` opened for it.
    Success {
        reply_index: usize,
        follow_up: FollowUpId,
    },
    /// The gateway failed; an error notice was appended at `notice_index`.
    Failed {
        notice_index: usize,
        error: GatewayError,
    },
}

/// Runs chat exchanges against a [`Gateway`].
pub struct RequestOrchestrator<G: Gateway> {
    gateway: Arc<G>,
    state: ExchangeState,
    events: EventBus,
}

impl<G: Gateway> RequestOrchestrator<G> {
    pub fn new(gateway: Arc<G>, events: EventBus) -> Self {
        Self {
            gateway,
            state: ExchangeState::Idle,
            events,
        }
    }

    /// Current exchange state. `Idle` whenever no exchange is running.
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Submit `text` from `source` as the next user turn.
    ///
    /// Blank text, a stale follow-up or an exchange already in flight are
    /// rejected without touching the session. Gateway failures are not
    /// errors here: they end the exchange as [`ExchangeOutcome::Failed`].
    pub async fn submit(
        &mut self,
        session: &mut SessionState,
        affordances: &mut InputAffordances,
        parameters: ParameterSet,
        source: InputSource,
        text: &str,
    ) -> Result<ExchangeOutcome, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if self.state == ExchangeState::Sending {
            return Err(ValidationError::ExchangeInFlight);
        }
        if let InputSource::FollowUp(id) = source {
            if !affordances.take_follow_up(id) {
                debug!(follow_up = %id, "rejected submission from stale follow-up");
                return Err(ValidationError::StaleFollowUp);
            }
            self.events.publish(ConversationEvent::FollowUpClosed { id });
        }

        let mut exchange = ExchangeGuard::begin(&mut self.state, affordances, &self.events);

        let context = session.context_before(session.len());
        let index = session.append_message(MessageRole::User, text, Utc::now(), None);
        self.events.publish(ConversationEvent::MessageAppended {
            index,
            role: MessageRole::User,
        });

        let request = ChatRequest {
            message: text.to_string(),
            context,
            parameters,
        };
        debug!(
            context_len = request.context.len(),
            message_len = request.message.len(),
            "sending chat request"
        );

        let outcome = match self.gateway.chat(&request).await {
            Ok(reply) => {
                let timestamp = reply.timestamp.unwrap_or_else(Utc::now);
                let reply_index = session.append_message(
                    MessageRole::Assistant,
                    reply.response,
                    timestamp,
                    reply.metadata,
                );
                self.events.publish(ConversationEvent::MessageAppended {
                    index: reply_index,
                    role: MessageRole::Assistant,
                });
                exchange.transition(ExchangeState::Success);

                let (follow_up, discarded) = exchange.affordances.open_follow_up();
                if let Some(id) = discarded {
                    self.events.publish(ConversationEvent::FollowUpClosed { id });
                }
                self.events
                    .publish(ConversationEvent::FollowUpOpened { id: follow_up });

                info!(reply_index, transcript_len = session.len(), "exchange succeeded");
                ExchangeOutcome::Success {
                    reply_index,
                    follow_up,
                }
            }
            Err(error) => {
                let notice_index = session.append_message(
                    MessageRole::System,
                    format!("Error: {}", error.description()),
                    Utc::now(),
                    None,
                );
                self.events.publish(ConversationEvent::MessageAppended {
                    index: notice_index,
                    role: MessageRole::System,
                });
                exchange.transition(ExchangeState::Failed);

                warn!(error = %error, "exchange failed");
                ExchangeOutcome::Failed {
                    notice_index,
                    error,
                }
            }
        };

        drop(exchange);
        Ok(outcome)
    }
}

/// Holds the orchestrator in `Sending` for the lifetime of one exchange.
///
/// Dropping it settles the affordances and returns to `Idle`, so an exchange
/// whose future is cancelled mid-request leaves the orchestrator usable.
struct ExchangeGuard<'a> {
    state: &'a mut ExchangeState,
    affordances: &'a mut InputAffordances,
    events: &'a EventBus,
}

impl<'a> ExchangeGuard<'a> {
    fn begin(
        state: &'a mut ExchangeState,
        affordances: &'a mut InputAffordances,
        events: &'a EventBus,
    ) -> Self {
        affordances.begin_sending();
        let mut guard = Self {
            state,
            affordances,
            events,
        };
        guard.transition(ExchangeState::Sending);
        guard
    }

    fn transition(&mut self, state: ExchangeState) {
        *self.state = state;
        self.events
            .publish(ConversationEvent::ExchangeStateChanged { state });
    }
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        if *self.state == ExchangeState::Sending {
            warn!("exchange abandoned before the gateway answered");
        }
        self.affordances.settle();
        self.transition(ExchangeState::Idle);
    }
}
