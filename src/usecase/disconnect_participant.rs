//! UseCase: connection teardown.
//!
//! Disconnection is a normal lifecycle transition, not an error. The entry
//! leaves the registry, presence is recomputed, and any typing timer the
//! participant held in the room is cancelled so no stray broadcast can reach
//! a room the participant already left. Room records and their messages are
//! never touched.

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, ParticipantId, RoomId},
    infrastructure::InMemoryRoomDirectory,
    ui::state::ConnectionRegistry,
    usecase::TypingCoordinator,
};

/// Connection teardown: unregister, detach, cancel timers.
pub struct DisconnectUseCase {
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<InMemoryRoomDirectory>,
    typing: Arc<TypingCoordinator>,
}

impl DisconnectUseCase {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        rooms: Arc<InMemoryRoomDirectory>,
        typing: Arc<TypingCoordinator>,
    ) -> Self {
        Self {
            registry,
            rooms,
            typing,
        }
    }

    /// Remove the connection. Returns the participant and the room it was
    /// attached to, for logging; `None` if the registry never knew it.
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Option<(ParticipantId, Option<RoomId>)> {
        let (participant, room) = self.registry.unregister(connection_id).await?;

        if let Some(room_id) = &room {
            self.rooms.detach(room_id, connection_id).await;

            // Last connection of this participant in the room: clear the
            // typing indicator on the counterpart's side.
            if self
                .registry
                .participant_connections_in_room(room_id, &participant)
                .await
                == 0
            {
                self.typing.stop_typing(room_id, &participant).await;
            }
        }

        Some((participant, room))
    }
}
