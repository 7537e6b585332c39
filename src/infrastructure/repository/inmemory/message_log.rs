//! In-memory message log implementation.
//!
//! Implements the domain's `MessageLog` trait with per-room vectors behind an
//! async mutex. Survives for the process lifetime only; a database-backed
//! implementation replaces this behind the same trait when durable storage
//! across restarts is required.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        MessageBody, MessageLog, MessageLogError, ParticipantId, RoomId, StoredMessage, Timestamp,
    },
    time::now_utc_millis,
};

#[derive(Debug, Default)]
struct RoomLog {
    messages: Vec<StoredMessage>,
    last_timestamp: i64,
    next_seq: u64,
}

/// In-memory `MessageLog` keyed by room id.
#[derive(Debug, Default)]
pub struct InMemoryMessageLog {
    logs: Mutex<HashMap<RoomId, RoomLog>>,
}

impl InMemoryMessageLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageLog for InMemoryMessageLog {
    async fn append(
        &self,
        room_id: RoomId,
        sender: ParticipantId,
        receiver: ParticipantId,
        body: MessageBody,
    ) -> Result<StoredMessage, MessageLogError> {
        let mut logs = self.logs.lock().await;
        let log = logs.entry(room_id.clone()).or_default();

        // Strictly greater than the previous message of the room, even when
        // the wall clock stalls or steps backwards.
        let timestamp = now_utc_millis().max(log.last_timestamp + 1);
        let seq = log.next_seq;

        let message = StoredMessage {
            room_id,
            sender,
            receiver,
            body,
            created_at: Timestamp::new(timestamp),
            seq,
        };

        log.messages.push(message.clone());
        log.last_timestamp = timestamp;
        log.next_seq += 1;

        Ok(message)
    }

    async fn history(
        &self,
        room_id: &RoomId,
        limit: Option<usize>,
    ) -> Result<Vec<StoredMessage>, MessageLogError> {
        let logs = self.logs.lock().await;
        let Some(log) = logs.get(room_id) else {
            return Ok(Vec::new());
        };

        let messages = match limit {
            Some(n) if n < log.messages.len() => log.messages[log.messages.len() - n..].to_vec(),
            _ => log.messages.clone(),
        };
        Ok(messages)
    }
}
