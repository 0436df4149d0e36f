//! Wire types shared by the REST helpers and the gateway client.
//!
//! The gateway and the history endpoint are permissive about payload shapes
//! (presence arrives as a list or a keyed map, history as a bare array or a
//! wrapped object), so parsing here is defensive field-by-field extraction
//! over `serde_json::Value` rather than strict deserialization.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The authenticated customer, as returned by `/api/auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// A support agent currently online.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffPresence {
    pub staff_id: String,
    pub user_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A support conversation room. Opaque to the client beyond its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub participant_ids: Vec<String>,
}

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    Customer,
    Staff,
}

/// A single immutable chat message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub room_id: String,
    pub sender_id: String,
    pub sender_role: SenderRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Parse a message from a gateway or history payload.
    ///
    /// Accepts `content` or `message` for the body, and `createdAt` as
    /// either an RFC 3339 string or an epoch-milliseconds number. Returns
    /// `None` for payloads missing an id, room, or body.
    pub fn from_value(data: &Value) -> Option<Self> {
        let id = data.get("id").and_then(Value::as_str)?.to_owned();
        let room_id = data.get("roomId").and_then(Value::as_str)?.to_owned();
        let content = data
            .get("content")
            .and_then(Value::as_str)
            .or_else(|| data.get("message").and_then(Value::as_str))?
            .to_owned();

        let sender_id = data
            .get("senderId")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_owned();

        let sender_role = match data.get("senderRole").and_then(Value::as_str) {
            Some("staff") => SenderRole::Staff,
            _ => SenderRole::Customer,
        };

        let created_at = parse_timestamp(data.get("createdAt"))?;

        Some(Self { id, room_id, sender_id, sender_role, content, created_at })
    }
}

fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let value = value?;
    if let Some(text) = value.as_str() {
        return DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
    }
    let millis = value.as_i64()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Normalize a presence broadcast into an ordered staff list.
///
/// The gateway sends either an ordered list of staff entries or a mapping of
/// staff id to entry; any other shape (including null) yields an empty list.
pub fn normalize_presence(value: &Value) -> Vec<StaffPresence> {
    match value {
        Value::Array(items) => items.iter().filter_map(|v| parse_staff(v, None)).collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, v)| parse_staff(v, Some(key)))
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_staff(value: &Value, fallback_id: Option<&str>) -> Option<StaffPresence> {
    let staff_id = value
        .get("staffId")
        .and_then(Value::as_str)
        .or(fallback_id)?
        .to_owned();
    let user_name = value
        .get("userName")
        .and_then(Value::as_str)
        .unwrap_or("Support")
        .to_owned();
    let avatar_url = value
        .get("avatarUrl")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned);

    Some(StaffPresence { staff_id, user_name, avatar_url })
}

/// A normalized page of room history.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryPage {
    pub messages: Vec<ChatMessage>,
    pub has_more: bool,
    pub oldest_message_id: Option<String>,
}

impl HistoryPage {
    /// Normalize a history response.
    ///
    /// Accepts either a bare ordered message array or an object carrying
    /// `{ messages, hasMore, oldestMessageId }`. A missing `hasMore` derives
    /// as "the page was full" (`count == limit`); a missing
    /// `oldestMessageId` derives as the id of the first (oldest) returned
    /// message, or nothing for an empty page.
    pub fn from_value(value: &Value, limit: usize) -> Self {
        let none = Vec::new();
        let (raw, explicit_more, explicit_oldest) = match value {
            Value::Array(items) => (items, None, None),
            Value::Object(map) => (
                map.get("messages").and_then(Value::as_array).unwrap_or(&none),
                map.get("hasMore").and_then(Value::as_bool),
                map.get("oldestMessageId")
                    .and_then(Value::as_str)
                    .map(ToOwned::to_owned),
            ),
            _ => (&none, None, None),
        };

        let messages: Vec<ChatMessage> =
            raw.iter().filter_map(ChatMessage::from_value).collect();
        let has_more = explicit_more.unwrap_or(messages.len() == limit);
        let oldest_message_id =
            explicit_oldest.or_else(|| messages.first().map(|m| m.id.clone()));

        Self { messages, has_more, oldest_message_id }
    }
}

/// Envelope for every gateway message: `{ "event": ..., "data": ... }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Ask the gateway for the current set of online staff.
    pub fn presence_query() -> Self {
        Self { event: "get_online_staffs".to_owned(), data: Value::Null }
    }

    /// Subscribe to a room's live events.
    pub fn join_room(room_id: &str) -> Self {
        Self {
            event: "join_room".to_owned(),
            data: serde_json::json!({ "roomId": room_id }),
        }
    }

    /// Unsubscribe from a room.
    pub fn leave_room(room_id: &str) -> Self {
        Self {
            event: "leave_room".to_owned(),
            data: serde_json::json!({ "roomId": room_id }),
        }
    }

    /// Publish a customer message to a room. Delivery is best-effort.
    pub fn send_message(room_id: &str, sender_id: &str, content: &str) -> Self {
        Self {
            event: "send_message".to_owned(),
            data: serde_json::json!({
                "roomId": room_id,
                "senderId": sender_id,
                "senderRole": "customer",
                "content": content,
            }),
        }
    }
}
