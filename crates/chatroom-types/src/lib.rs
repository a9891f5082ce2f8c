//! Shared data types for the chatroom client.
//!
//! These mirror the JSON shapes exchanged with the chat backend, both over
//! HTTP and over the per-session websocket channel.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque session identifier.
pub type SessionId = String;

/// Sender name used for messages typed by the local user.
pub const DEFAULT_SELF_SENDER: &str = "me";

/// Sender name used by the automated responder.
pub const DEFAULT_ASSISTANT_SENDER: &str = "AI";

// ============================================================================
// Messages
// ============================================================================

/// A chat message as delivered over the live channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub content: String,
    /// Milliseconds since the epoch, assigned by whoever created the message.
    pub ts: i64,
}

impl Message {
    pub fn new(sender: impl Into<String>, content: impl Into<String>, ts: i64) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            ts,
        }
    }

    /// Returns true if both messages carry the same `(ts, content, sender)` triple.
    ///
    /// There is no separate id on the wire, so this is the only way to spot a
    /// redelivered message.
    pub fn same_delivery(&self, other: &Message) -> bool {
        self.ts == other.ts && self.content == other.content && self.sender == other.sender
    }
}

/// Composite identity of a soft-deleted message.
///
/// `ts` alone is not unique: a message can be deleted, restored and deleted
/// again, producing two history entries with the same original timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeletedKey {
    pub ts: i64,
    pub deleted_at: i64,
}

impl fmt::Display for DeletedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ts, self.deleted_at)
    }
}

/// A message that has been soft-deleted and can be restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    pub content: String,
    /// Original timestamp of the message (milliseconds).
    pub ts: i64,
    /// When the message was deleted (seconds).
    pub deleted_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl DeletedMessage {
    pub fn key(&self) -> DeletedKey {
        DeletedKey {
            ts: self.ts,
            deleted_at: self.deleted_at,
        }
    }
}

/// One bucket of the hourly activity aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyTrend {
    /// Bucket start formatted as `YYYY-MM-DD HH:00:00`.
    pub time_slot: String,
    pub count: u64,
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDeleteRequest {
    pub session_id: SessionId,
    pub ts_list: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreRequest {
    pub session_id: SessionId,
    pub ts_to_restore: i64,
    pub deleted_at: i64,
}

impl RestoreRequest {
    pub fn for_entry(session_id: &str, key: DeletedKey) -> Self {
        Self {
            session_id: session_id.to_string(),
            ts_to_restore: key.ts,
            deleted_at: key.deleted_at,
        }
    }
}

// ============================================================================
// Response bodies
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionsResponse {
    #[serde(default)]
    pub sessions: Vec<SessionId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeletedHistoryResponse {
    #[serde(default)]
    pub deleted_messages: Vec<DeletedMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub session_ids: Vec<SessionId>,
}

/// Hourly buckets plus the backend's note when there is nothing to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HourlyTrendResponse {
    #[serde(default)]
    pub hourly_trend: Vec<HourlyTrend>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic acknowledgement (`{"msg": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub msg: String,
}

/// Error body produced by the backend (`{"detail": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_message_ignores_extra_fields() {
        let msg: Message = serde_json::from_value(json!({
            "session_id": "demo",
            "sender": "AI",
            "content": "hello",
            "ts": 1_764_060_332_607_i64
        }))
        .unwrap();
        assert_eq!(msg, Message::new("AI", "hello", 1_764_060_332_607));
    }

    #[test]
    fn test_same_delivery_requires_all_three_fields() {
        let a = Message::new("me", "hi", 10);
        assert!(a.same_delivery(&Message::new("me", "hi", 10)));
        assert!(!a.same_delivery(&Message::new("AI", "hi", 10)));
        assert!(!a.same_delivery(&Message::new("me", "hi", 11)));
        assert!(!a.same_delivery(&Message::new("me", "hey", 10)));
    }

    #[test]
    fn test_deleted_message_optional_fields() {
        let entry: DeletedMessage = serde_json::from_value(json!({
            "content": "gone",
            "ts": 20,
            "deleted_at": 1_764_064_879
        }))
        .unwrap();
        assert_eq!(entry.sender, None);
        assert_eq!(entry.session_id, None);
        assert_eq!(entry.key().to_string(), "20-1764064879");
    }

    #[test]
    fn test_missing_list_keys_default_to_empty() {
        let history: DeletedHistoryResponse = serde_json::from_str("{}").unwrap();
        assert!(history.deleted_messages.is_empty());
        let search: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(search.session_ids.is_empty());
        let trend: HourlyTrendResponse =
            serde_json::from_str(r#"{"hourly_trend": [], "message": "No data"}"#).unwrap();
        assert!(trend.hourly_trend.is_empty());
        assert_eq!(trend.message.as_deref(), Some("No data"));
    }

    #[test]
    fn test_error_detail_text() {
        let err: ErrorResponse =
            serde_json::from_str(r#"{"detail": "Session not found"}"#).unwrap();
        assert_eq!(err.detail_text().as_deref(), Some("Session not found"));
        let err: ErrorResponse = serde_json::from_str(r#"{"detail": [{"loc": 1}]}"#).unwrap();
        assert_eq!(err.detail_text().as_deref(), Some(r#"[{"loc":1}]"#));
        let err: ErrorResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(err.detail_text(), None);
    }
}
