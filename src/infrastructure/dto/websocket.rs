//! WebSocket wire protocol DTOs.
//!
//! JSON text frames, internally tagged by `type`, camelCase field names. These
//! are the only types that describe the wire format; domain types never cross
//! the socket directly.

use serde::{Deserialize, Serialize};

use crate::domain::{Room, StoredMessage};

/// Client → server events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Attach this connection to a room and receive its history.
    JoinRoom { room_id: String },
    /// The participant is typing in the room.
    Typing {
        room_id: String,
        sender: String,
        receiver: String,
    },
    /// Persist a message and fan it out to the room.
    SendMessage {
        room_id: String,
        sender: String,
        receiver: String,
        message: String,
    },
}

/// Server → client events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Full ordered history, sent to the joining connection only.
    ChatHistory { messages: Vec<MessageDto> },
    /// Room metadata, sent to the joining connection only.
    RoomJoined { room: RoomInfoDto },
    /// One persisted message, sent to every other connection in the room.
    NewMessage { message: MessageDto },
    /// Typing banner text for the counterpart: "<name> is typing" or "".
    ResponseTyping { message: String },
    /// Ack to the originator: the message was persisted.
    MessageSent { message: MessageDto },
    /// Validation or storage failure, sent to the originator only.
    Error { reason: String },
}

/// A persisted message as rendered on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub room_id: String,
    pub sender: String,
    pub receiver: String,
    pub message: String,
    /// Server-assigned creation timestamp, Unix milliseconds UTC
    pub created_at: i64,
    /// Per-room insertion sequence
    pub seq: u64,
}

impl From<StoredMessage> for MessageDto {
    fn from(message: StoredMessage) -> Self {
        Self {
            room_id: message.room_id.into_string(),
            sender: message.sender.into_string(),
            receiver: message.receiver.into_string(),
            message: message.body.into_string(),
            created_at: message.created_at.value(),
            seq: message.seq,
        }
    }
}

/// Room metadata as rendered on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfoDto {
    pub room_id: String,
    pub participants: Vec<String>,
    /// Unix milliseconds UTC
    pub created_at: i64,
}

impl From<&Room> for RoomInfoDto {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id.to_string(),
            participants: vec![room.members.0.to_string(), room.members.1.to_string()],
            created_at: room.created_at.value(),
        }
    }
}
