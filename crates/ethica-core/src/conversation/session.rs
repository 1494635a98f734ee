//! Session state: the ordered transcript plus session identity.
//!
//! `SessionState` is the single source of truth for what has been said.
//! Messages are append-only during a live conversation and replaced
//! wholesale on clear or load. The identity stays `None` until the session
//! is saved or restored from the remote store.

use chrono::{DateTime, Utc};
use ethica_types::chat::{ContextEntry, ConversationId, Message, MessageRole};

/// Ordered conversation transcript and its remote identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    id: Option<ConversationId>,
    messages: Vec<Message>,
}

impl SessionState {
    /// An empty, unsaved session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote identity, assigned only after a successful save or load.
    pub fn id(&self) -> Option<&ConversationId> {
        self.id.as_ref()
    }

    /// The transcript in conversation order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message and return its index in the transcript.
    ///
    /// Existing entries are never reordered or removed.
    pub fn append_message(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
        metadata: Option<serde_json::Value>,
    ) -> usize {
        self.messages.push(Message {
            role,
            content: content.into(),
            timestamp: Some(timestamp),
            metadata,
        });
        self.messages.len() - 1
    }

    /// Clear transcript and identity.
    pub fn reset(&mut self) {
        self.id = None;
        self.messages.clear();
    }

    /// Set identity and transcript in one step.
    pub fn replace(&mut self, id: ConversationId, messages: Vec<Message>) {
        self.id = Some(id);
        self.messages = messages;
    }

    /// Record the identity returned by the store after a save.
    pub fn assign_id(&mut self, id: ConversationId) {
        self.id = Some(id);
    }

    /// Drop the identity, keeping the transcript (the stored copy is gone).
    pub fn forget_id(&mut self) {
        self.id = None;
    }

    /// Read-only copy of the transcript at this point in time.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// The `{role, content}` context for the first `upto` messages.
    ///
    /// Local system notices (failed exchanges) are not part of the
    /// conversation the backend sees.
    pub fn context_before(&self, upto: usize) -> Vec<ContextEntry> {
        self.messages[..upto.min(self.messages.len())]
            .iter()
            .filter(|message| message.role != MessageRole::System)
            .map(Message::to_context_entry)
            .collect()
    }
}
