//! Conversation message and saved-conversation types for Ethica.
//!
//! These types model the transcript held by the client (`Message`), the
//! payloads exchanged with the backend's `/chat` endpoint, and the records
//! owned by the remote conversation store.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::parameters::ParameterSet;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// One conversational turn.
///
/// `metadata` carries the backend's moderation result and is only present
/// on assistant turns. Timestamps may be absent on transcripts restored
/// from the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    #[serde(
        default,
        with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Message {
    /// Strip the message down to the `{role, content}` pair sent as context.
    pub fn to_context_entry(&self) -> ContextEntry {
        ContextEntry {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Identifier of a conversation in the remote store.
///
/// Always assigned by the store. The store issues string ids
/// (`conv_1712345678`); numeric ids are accepted and kept in decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for ConversationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

/// A `{role, content}` pair of prior conversation sent with a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub role: MessageRole,
    pub content: String,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub context: Vec<ContextEntry>,
    pub parameters: ParameterSet,
}

/// Successful body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(
        default,
        with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Body of `POST /conversations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConversationRequest {
    pub name: String,
    pub messages: Vec<Message>,
}

/// Successful body of `POST /conversations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConversationResponse {
    pub id: ConversationId,
}

/// Summary record of a conversation held by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedConversation {
    pub id: ConversationId,
    #[serde(default = "default_conversation_name")]
    pub name: String,
    #[serde(default)]
    pub message_count: u32,
    #[serde(
        default,
        with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

fn default_conversation_name() -> String {
    "Unnamed".to_string()
}

/// Body of `GET /conversations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationList {
    #[serde(default)]
    pub conversations: Vec<SavedConversation>,
}

/// Body of `GET /conversations/{id}`: the full stored transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDetail {
    #[serde(default)]
    pub id: Option<ConversationId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(
        default,
        with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and zone-less ISO-8601 (read as UTC), which is what the
/// backend emits.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

/// Serde adapter for optional timestamps that never fails on bad input.
///
/// Missing, null, non-string and unparseable values all read as `None`.
pub mod lenient_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(|value| value.as_str())
            .and_then(super::parse_timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant, MessageRole::System] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
        assert!("narrator".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_conversation_id_accepts_string_and_number() {
        let text: ConversationId = serde_json::from_value(json!("conv_1712345678")).unwrap();
        assert_eq!(text.as_str(), "conv_1712345678");

        let number: ConversationId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(number, ConversationId::from("42"));
        assert_eq!(serde_json::to_value(&number).unwrap(), json!("42"));
    }

    #[test]
    fn test_parse_timestamp_naive_iso() {
        let ts = parse_timestamp("2024-05-01T10:20:30.123456").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.second(), 30);
    }

    #[test]
    fn test_parse_timestamp_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_message_without_timestamp_or_metadata() {
        let msg: Message = serde_json::from_value(json!({"role": "user", "content": "hi"})).unwrap();
        assert_eq!(msg.role, MessageRole::User);
        assert!(msg.timestamp.is_none());
        assert!(msg.metadata.is_none());

        let out = serde_json::to_value(&msg).unwrap();
        assert_eq!(out, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_message_with_bad_timestamp_still_parses() {
        let msg: Message = serde_json::from_value(json!({
            "role": "assistant",
            "content": "ok",
            "timestamp": "",
            "metadata": {"blocked": false}
        }))
        .unwrap();
        assert!(msg.timestamp.is_none());
        assert_eq!(msg.metadata, Some(json!({"blocked": false})));
    }

    #[test]
    fn test_context_entry_drops_timestamp_and_metadata() {
        let msg = Message {
            role: MessageRole::Assistant,
            content: "hello".to_string(),
            timestamp: Some(Utc::now()),
            metadata: Some(json!({"x": 1})),
        };
        let entry = serde_json::to_value(msg.to_context_entry()).unwrap();
        assert_eq!(entry, json!({"role": "assistant", "content": "hello"}));
    }

    #[test]
    fn test_conversation_list_defaults() {
        let list: ConversationList = serde_json::from_value(json!({
            "conversations": [
                {"id": "conv_2", "name": "second", "message_count": 4, "timestamp": "2024-05-02T09:00:00"},
                {"id": "conv_1", "timestamp": ""}
            ]
        }))
        .unwrap();
        assert_eq!(list.conversations.len(), 2);
        assert_eq!(list.conversations[0].message_count, 4);
        assert!(list.conversations[0].timestamp.is_some());
        assert_eq!(list.conversations[1].name, "Unnamed");
        assert!(list.conversations[1].timestamp.is_none());
    }

    #[test]
    fn test_conversation_detail_without_messages() {
        let detail: ConversationDetail = serde_json::from_value(json!({"id": 7})).unwrap();
        assert_eq!(detail.id, Some(ConversationId::from("7")));
        assert!(detail.messages.is_empty());
    }
}
