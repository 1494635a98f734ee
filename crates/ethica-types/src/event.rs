//! Event types for the Ethica conversation event bus.
//!
//! `ConversationEvent` is broadcast by the conversation core whenever the
//! transcript, the exchange lifecycle, or the input affordances change.
//! The presentation layer renders from these events. All variants are
//! Clone + Send + Sync for use with tokio broadcast channels.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::chat::{ConversationId, MessageRole};

/// Identifier of a single-use follow-up input opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FollowUpId(pub u64);

impl fmt::Display for FollowUpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "follow-up #{}", self.0)
    }
}

/// Lifecycle of one exchange: `Idle -> Sending -> (Success | Failed) -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeState {
    #[default]
    Idle,
    Sending,
    Success,
    Failed,
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeState::Idle => write!(f, "idle"),
            ExchangeState::Sending => write!(f, "sending"),
            ExchangeState::Success => write!(f, "success"),
            ExchangeState::Failed => write!(f, "failed"),
        }
    }
}

/// Events emitted by the conversation core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// A message was appended at `index` of the transcript.
    MessageAppended { index: usize, role: MessageRole },

    /// The orchestrator moved to a new exchange state.
    ExchangeStateChanged { state: ExchangeState },

    /// A follow-up input opportunity became live.
    FollowUpOpened { id: FollowUpId },

    /// A follow-up input opportunity was consumed or discarded.
    FollowUpClosed { id: FollowUpId },

    /// Transcript and identity were cleared.
    SessionReset,

    /// A saved conversation replaced the in-memory session.
    SessionRestored {
        id: ConversationId,
        message_count: usize,
    },

    /// The current session was persisted under `id`.
    SessionSaved { id: ConversationId },

    /// A saved conversation was removed from the store.
    SavedConversationDeleted { id: ConversationId },
}
