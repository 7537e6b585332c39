//! Core domain models for the messaging subsystem.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{
    error::RoomError,
    value_object::{ConnectionId, MessageBody, ParticipantId, RoomId, Timestamp},
};

/// Live-presence state of a room.
///
/// A room never terminates: it conceptually exists as long as its history is
/// retained, flipping between `Active` and `Idle` as connections come and go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    /// At least one connection is attached.
    Active,
    /// No connection is attached; history is still queryable.
    Idle,
}

/// A conversation scoped to exactly two participants.
///
/// Membership is fixed at creation, derived from the room id. Attached
/// connections vary over time; a participant may attach several at once
/// (multiple tabs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier (deterministic function of the member pair)
    pub id: RoomId,
    /// The two designated members, lexicographically ordered
    pub members: (ParticipantId, ParticipantId),
    /// Connections currently attached to the room
    pub connections: BTreeSet<ConnectionId>,
    /// Timestamp when the room record was first created
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new idle room for the member pair encoded in `id`.
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        let members = id.members();
        Self {
            id,
            members,
            connections: BTreeSet::new(),
            created_at,
        }
    }

    /// Attach a connection on behalf of `participant`.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::Forbidden` if the participant is not one of the
    /// room's two designated members.
    pub fn attach(
        &mut self,
        participant: &ParticipantId,
        connection_id: ConnectionId,
    ) -> Result<(), RoomError> {
        if !self.id.has_member(participant) {
            return Err(RoomError::Forbidden {
                room: self.id.to_string(),
                participant: participant.to_string(),
            });
        }
        self.connections.insert(connection_id);
        Ok(())
    }

    /// Detach a connection. Detaching an unattached connection is a no-op.
    pub fn detach(&mut self, connection_id: &ConnectionId) {
        self.connections.remove(connection_id);
    }

    pub fn state(&self) -> RoomState {
        if self.connections.is_empty() {
            RoomState::Idle
        } else {
            RoomState::Active
        }
    }
}

/// A persisted chat message. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Room the message belongs to
    pub room_id: RoomId,
    /// Sending participant
    pub sender: ParticipantId,
    /// Receiving participant (the sender's counterpart in the room)
    pub receiver: ParticipantId,
    /// Trimmed message text
    pub body: MessageBody,
    /// Server-assigned creation timestamp, monotonic per room
    pub created_at: Timestamp,
    /// Per-room insertion sequence, the total-order tie-breaker
    pub seq: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room::new(
            RoomId::parse("u1_u2".to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    #[test]
    fn test_room_new_is_idle() {
        // when:
        let room = room();

        // then:
        assert_eq!(room.state(), RoomState::Idle);
        assert_eq!(room.members.0.as_str(), "u1");
        assert_eq!(room.members.1.as_str(), "u2");
        assert!(room.connections.is_empty());
    }

    #[test]
    fn test_room_attach_member_success() {
        // given:
        let mut room = room();
        let u1 = ParticipantId::new("u1".to_string()).unwrap();
        let conn = ConnectionId::generate();

        // when:
        let result = room.attach(&u1, conn.clone());

        // then: first attach flips the room to active
        assert!(result.is_ok());
        assert_eq!(room.state(), RoomState::Active);
        assert!(room.connections.contains(&conn));
    }

    #[test]
    fn test_room_attach_non_member_forbidden() {
        // given:
        let mut room = room();
        let intruder = ParticipantId::new("u3".to_string()).unwrap();

        // when:
        let result = room.attach(&intruder, ConnectionId::generate());

        // then: the connection is never added
        assert!(matches!(result.unwrap_err(), RoomError::Forbidden { .. }));
        assert!(room.connections.is_empty());
    }

    #[test]
    fn test_room_state_machine_active_idle_active() {
        // given:
        let mut room = room();
        let u1 = ParticipantId::new("u1".to_string()).unwrap();
        let conn1 = ConnectionId::generate();
        let conn2 = ConnectionId::generate();

        // when: two attaches, then both detach, then a rejoin
        room.attach(&u1, conn1.clone()).unwrap();
        room.attach(&u1, conn2.clone()).unwrap();
        assert_eq!(room.state(), RoomState::Active);

        room.detach(&conn1);
        assert_eq!(room.state(), RoomState::Active);

        room.detach(&conn2);
        // then: last detach goes idle, not terminal
        assert_eq!(room.state(), RoomState::Idle);

        room.attach(&u1, ConnectionId::generate()).unwrap();
        assert_eq!(room.state(), RoomState::Active);
    }

    #[test]
    fn test_room_detach_unknown_connection_is_noop() {
        // given:
        let mut room = room();

        // when:
        room.detach(&ConnectionId::generate());

        // then:
        assert_eq!(room.state(), RoomState::Idle);
    }
}
