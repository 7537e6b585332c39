//! UseCase: persist a message and fan it out to the room.
//!
//! All sends for a room serialize through the room's lock, held across
//! append and fan-out: every attached connection observes messages in
//! append-commit order. Sends to different rooms share no lock and run fully
//! in parallel.

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, MessageBody, MessageLog, ParticipantId, RoomId, StoredMessage, ValueObjectError},
    infrastructure::{InMemoryRoomDirectory, dto::websocket::ServerEvent},
    ui::state::ConnectionRegistry,
};

use super::error::SendMessageError;

/// Message send: validation, append, ordered broadcast.
pub struct SendMessageUseCase {
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<InMemoryRoomDirectory>,
    message_log: Arc<dyn MessageLog>,
}

impl SendMessageUseCase {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        rooms: Arc<InMemoryRoomDirectory>,
        message_log: Arc<dyn MessageLog>,
    ) -> Self {
        Self {
            registry,
            rooms,
            message_log,
        }
    }

    /// Validate, persist and broadcast one message.
    ///
    /// The persisted message goes to every connection attached to the room
    /// except the originating one, so the sender's other tabs receive it too.
    /// The originator gets the returned record as its ack instead.
    ///
    /// # Errors
    ///
    /// `NotAttached` if the connection has not joined the room;
    /// `EmptyMessage` for a body that trims to nothing; `Forbidden` if the
    /// (sender, receiver) pair does not match the room members;
    /// `Storage` if the append fails (nothing is broadcast then).
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        sender: ParticipantId,
        receiver: ParticipantId,
        raw_body: String,
    ) -> Result<StoredMessage, SendMessageError> {
        match self.registry.room_of(connection_id).await {
            Some(current) if current == room_id => {}
            _ => return Err(SendMessageError::NotAttached(room_id.to_string())),
        }

        let body = MessageBody::new(raw_body).map_err(|e| match e {
            ValueObjectError::MessageBodyEmpty => SendMessageError::EmptyMessage,
            other => SendMessageError::InvalidBody(other),
        })?;

        match room_id.counterpart(&sender) {
            Some(expected_receiver) if expected_receiver == receiver => {}
            _ => return Err(SendMessageError::Forbidden(room_id.to_string())),
        }

        let lock = self.rooms.send_lock(&room_id).await;
        let _guard = lock.lock().await;

        let stored = self
            .message_log
            .append(room_id.clone(), sender, receiver, body)
            .await?;

        let frame = serde_json::to_string(&ServerEvent::NewMessage {
            message: stored.clone().into(),
        })
        .unwrap();

        for (target, _participant) in self.registry.connections_in_room(&room_id).await {
            if &target == connection_id {
                continue;
            }
            if !self.registry.send_to(&target, frame.clone()).await {
                tracing::warn!("failed to deliver message to connection '{target}'");
            }
        }

        Ok(stored)
    }
}
