//! Value Objects for the messaging domain.
//!
//! Value Objects are immutable and compared by value, not identity. All
//! identifiers that cross the wire are validated here before any component
//! touches them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Separator between the two member ids inside a [`RoomId`].
pub const ROOM_ID_SEPARATOR: char = '_';

/// Maximum length of a participant identifier.
pub const PARTICIPANT_ID_MAX_LEN: usize = 64;

/// Maximum length of a message body, in characters.
pub const MESSAGE_BODY_MAX_LEN: usize = 10_000;

/// Participant identifier value object.
///
/// Restricted to `[A-Za-z0-9-]` so the `_` room-id separator can never occur
/// inside a member id, keeping [`RoomId`] parsing unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ParticipantIdEmpty);
        }
        let len = id.len();
        if len > PARTICIPANT_ID_MAX_LEN {
            return Err(ValueObjectError::ParticipantIdTooLong {
                max: PARTICIPANT_ID_MAX_LEN,
                actual: len,
            });
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ValueObjectError::ParticipantIdInvalid(id));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// A room id is a pure function of its two member ids: sort the pair
/// lexicographically and join with `_`. Both participants derive the same id
/// without any negotiation step, so there is no "room not found" race between
/// their independent joins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Derive the room id for a participant pair. Order-independent.
    pub fn for_pair(a: &ParticipantId, b: &ParticipantId) -> Result<Self, ValueObjectError> {
        if a == b {
            return Err(ValueObjectError::RoomIdSameParticipant(a.to_string()));
        }
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Ok(Self(format!(
            "{}{}{}",
            first.as_str(),
            ROOM_ID_SEPARATOR,
            second.as_str()
        )))
    }

    /// Parse a wire-supplied room id, validating both member halves.
    pub fn parse(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        let mut parts = id.split(ROOM_ID_SEPARATOR);
        let (Some(first), Some(second), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ValueObjectError::RoomIdInvalidFormat(id));
        };
        let first = ParticipantId::new(first.to_string())
            .map_err(|_| ValueObjectError::RoomIdInvalidFormat(id.clone()))?;
        let second = ParticipantId::new(second.to_string())
            .map_err(|_| ValueObjectError::RoomIdInvalidFormat(id.clone()))?;
        if second <= first {
            return Err(ValueObjectError::RoomIdInvalidFormat(id));
        }
        Ok(Self(id))
    }

    /// The two designated members, in lexicographic order.
    pub fn members(&self) -> (ParticipantId, ParticipantId) {
        let mut parts = self.0.split(ROOM_ID_SEPARATOR);
        // Both halves were validated on construction.
        let first = ParticipantId(parts.next().unwrap_or_default().to_string());
        let second = ParticipantId(parts.next().unwrap_or_default().to_string());
        (first, second)
    }

    /// Whether the participant is one of the room's two designated members.
    pub fn has_member(&self, participant: &ParticipantId) -> bool {
        let (a, b) = self.members();
        &a == participant || &b == participant
    }

    /// The other member of the pair, if the given participant is a member.
    pub fn counterpart(&self, participant: &ParticipantId) -> Option<ParticipantId> {
        let (a, b) = self.members();
        if &a == participant {
            Some(b)
        } else if &b == participant {
            Some(a)
        } else {
            None
        }
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection identifier value object.
///
/// Opaque and unique per live socket; a participant may hold several at once
/// (multiple tabs). Generated server-side, never supplied by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a fresh connection id (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message body value object.
///
/// Leading/trailing whitespace is stripped on construction; a body that trims
/// to nothing is rejected, so blank sends can never reach the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::MessageBodyEmpty);
        }
        let len = trimmed.chars().count();
        if len > MESSAGE_BODY_MAX_LEN {
            return Err(ValueObjectError::MessageBodyTooLong {
                max: MESSAGE_BODY_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object: milliseconds since the Unix epoch, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_new_success() {
        // given:
        let id = "u1".to_string();

        // when:
        let result = ParticipantId::new(id);

        // then:
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "u1");
    }

    #[test]
    fn test_participant_id_empty_fails() {
        // when:
        let result = ParticipantId::new(String::new());

        // then:
        assert_eq!(result.unwrap_err(), ValueObjectError::ParticipantIdEmpty);
    }

    #[test]
    fn test_participant_id_rejects_separator() {
        // given: an id containing the room-id separator
        let id = "u_1".to_string();

        // when:
        let result = ParticipantId::new(id);

        // then:
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::ParticipantIdInvalid("u_1".to_string())
        );
    }

    #[test]
    fn test_participant_id_too_long_fails() {
        // given:
        let id = "a".repeat(PARTICIPANT_ID_MAX_LEN + 1);

        // when:
        let result = ParticipantId::new(id);

        // then:
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::ParticipantIdTooLong {
                max: PARTICIPANT_ID_MAX_LEN,
                actual: PARTICIPANT_ID_MAX_LEN + 1
            }
        );
    }

    #[test]
    fn test_room_id_for_pair_order_independent() {
        // given:
        let u1 = ParticipantId::new("u1".to_string()).unwrap();
        let u2 = ParticipantId::new("u2".to_string()).unwrap();

        // when:
        let a = RoomId::for_pair(&u1, &u2).unwrap();
        let b = RoomId::for_pair(&u2, &u1).unwrap();

        // then: both orders resolve to the same room
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "u1_u2");
    }

    #[test]
    fn test_room_id_for_pair_same_participant_fails() {
        // given:
        let u1 = ParticipantId::new("u1".to_string()).unwrap();

        // when:
        let result = RoomId::for_pair(&u1, &u1);

        // then:
        assert!(matches!(
            result.unwrap_err(),
            ValueObjectError::RoomIdSameParticipant(_)
        ));
    }

    #[test]
    fn test_room_id_parse_success() {
        // when:
        let room_id = RoomId::parse("alice_bob".to_string()).unwrap();

        // then:
        let (a, b) = room_id.members();
        assert_eq!(a.as_str(), "alice");
        assert_eq!(b.as_str(), "bob");
    }

    #[test]
    fn test_room_id_parse_rejects_unsorted_pair() {
        // given: members out of lexicographic order
        let result = RoomId::parse("bob_alice".to_string());

        // then: not the canonical derivation
        assert!(matches!(
            result.unwrap_err(),
            ValueObjectError::RoomIdInvalidFormat(_)
        ));
    }

    #[test]
    fn test_room_id_parse_rejects_garbage() {
        for bad in ["", "alice", "alice_bob_carol", "_bob", "alice_"] {
            let result = RoomId::parse(bad.to_string());
            assert!(result.is_err(), "expected {bad:?} to be rejected");
        }
    }

    #[test]
    fn test_room_id_membership() {
        // given:
        let room_id = RoomId::parse("u1_u2".to_string()).unwrap();
        let u1 = ParticipantId::new("u1".to_string()).unwrap();
        let u2 = ParticipantId::new("u2".to_string()).unwrap();
        let u3 = ParticipantId::new("u3".to_string()).unwrap();

        // then:
        assert!(room_id.has_member(&u1));
        assert!(room_id.has_member(&u2));
        assert!(!room_id.has_member(&u3));
        assert_eq!(room_id.counterpart(&u1), Some(u2.clone()));
        assert_eq!(room_id.counterpart(&u2), Some(u1));
        assert_eq!(room_id.counterpart(&u3), None);
    }

    #[test]
    fn test_connection_id_generate_uniqueness() {
        // when:
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then:
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_message_body_trims_whitespace() {
        // when:
        let body = MessageBody::new("  hello \n".to_string()).unwrap();

        // then:
        assert_eq!(body.as_str(), "hello");
    }

    #[test]
    fn test_message_body_whitespace_only_fails() {
        // when:
        let result = MessageBody::new("   \t\n".to_string());

        // then:
        assert_eq!(result.unwrap_err(), ValueObjectError::MessageBodyEmpty);
    }

    #[test]
    fn test_message_body_too_long_fails() {
        // given:
        let content = "a".repeat(MESSAGE_BODY_MAX_LEN + 1);

        // when:
        let result = MessageBody::new(content);

        // then:
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::MessageBodyTooLong {
                max: MESSAGE_BODY_MAX_LEN,
                actual: MESSAGE_BODY_MAX_LEN + 1
            }
        );
    }

    #[test]
    fn test_timestamp_ordering() {
        // given:
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then:
        assert!(ts1 < ts2);
    }
}
