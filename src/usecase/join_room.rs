//! UseCase: attach a connection to a room and replay its history.
//!
//! Join runs under the room's serialization lock: the connection is attached
//! and the history snapshot taken before any concurrent send can fan out, so
//! the pushed history is an exact prefix of the message stream: no gaps, no
//! duplicates.

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, MessageLog, ParticipantId, Room, RoomError, RoomId},
    infrastructure::{
        InMemoryRoomDirectory,
        dto::websocket::{RoomInfoDto, ServerEvent},
    },
    ui::state::ConnectionRegistry,
    usecase::TypingCoordinator,
};

use super::error::JoinRoomError;

/// Room join: membership validation, attach, history push.
pub struct JoinRoomUseCase {
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<InMemoryRoomDirectory>,
    message_log: Arc<dyn MessageLog>,
    typing: Arc<TypingCoordinator>,
}

impl JoinRoomUseCase {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        rooms: Arc<InMemoryRoomDirectory>,
        message_log: Arc<dyn MessageLog>,
        typing: Arc<TypingCoordinator>,
    ) -> Self {
        Self {
            registry,
            rooms,
            message_log,
            typing,
        }
    }

    /// Attach `connection_id` to `room_id` on behalf of `participant` and
    /// push `roomJoined` + `chatHistory` to that connection.
    ///
    /// A connection already attached elsewhere is moved: it is detached from
    /// its previous room first, with typing state cleaned up if it was the
    /// participant's last connection there.
    ///
    /// # Errors
    ///
    /// `Forbidden` if the participant is not one of the room's two members;
    /// `Storage` if history cannot be read. Neither leaves the connection
    /// attached.
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        participant: &ParticipantId,
        room_id: RoomId,
    ) -> Result<Room, JoinRoomError> {
        // Reject non-members before creating any room state.
        if !room_id.has_member(participant) {
            return Err(JoinRoomError::Forbidden(RoomError::Forbidden {
                room: room_id.to_string(),
                participant: participant.to_string(),
            }));
        }

        let lock = self.rooms.send_lock(&room_id).await;
        let _guard = lock.lock().await;

        let room = self
            .rooms
            .join(&room_id, participant, connection_id.clone())
            .await?;

        let previous = self.registry.attach(connection_id, room_id.clone()).await?;
        if let Some(previous_room) = previous
            && previous_room != room_id
        {
            self.rooms.detach(&previous_room, connection_id).await;
            if self
                .registry
                .participant_connections_in_room(&previous_room, participant)
                .await
                == 0
            {
                self.typing.stop_typing(&previous_room, participant).await;
            }
        }

        let history = match self.message_log.history(&room_id, None).await {
            Ok(history) => history,
            Err(e) => {
                // Roll the attach back; a half-joined connection would
                // receive broadcasts without ever seeing the history prefix.
                self.rooms.detach(&room_id, connection_id).await;
                self.registry.detach(connection_id).await;
                return Err(e.into());
            }
        };

        let joined_frame = serde_json::to_string(&ServerEvent::RoomJoined {
            room: RoomInfoDto::from(&room),
        })
        .unwrap();
        let history_frame = serde_json::to_string(&ServerEvent::ChatHistory {
            messages: history.into_iter().map(Into::into).collect(),
        })
        .unwrap();

        // To the joining connection only. Still under the room lock, so no
        // concurrently sent message can slip in between attach and history.
        self.registry.send_to(connection_id, joined_frame).await;
        self.registry.send_to(connection_id, history_frame).await;

        Ok(room)
    }
}
