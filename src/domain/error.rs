//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Object validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ParticipantId validation error
    #[error("ParticipantId cannot be empty")]
    ParticipantIdEmpty,

    /// ParticipantId too long error
    #[error("ParticipantId cannot exceed {max} characters (got {actual})")]
    ParticipantIdTooLong { max: usize, actual: usize },

    /// ParticipantId character set error
    #[error("ParticipantId may only contain letters, digits and '-' (got: {0})")]
    ParticipantIdInvalid(String),

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId format error (not `<a>_<b>` with sorted, valid member ids)
    #[error("RoomId must be two sorted participant ids joined by '_' (got: {0})")]
    RoomIdInvalidFormat(String),

    /// RoomId derivation error: a room needs two distinct participants
    #[error("a room requires two distinct participants (got {0} twice)")]
    RoomIdSameParticipant(String),

    /// MessageBody validation error
    #[error("message body cannot be empty")]
    MessageBodyEmpty,

    /// MessageBody too long error
    #[error("message body cannot exceed {max} characters (got {actual})")]
    MessageBodyTooLong { max: usize, actual: usize },
}

/// Errors related to room membership and presence
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// The participant is not one of the room's two designated members.
    #[error("participant '{participant}' is not a member of room '{room}'")]
    Forbidden { room: String, participant: String },
}

/// Errors raised by the message log port
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageLogError {
    /// Underlying persistence failure. Callers must not broadcast on this.
    #[error("message log failure: {0}")]
    StorageFailure(String),
}

/// Errors raised by the identity port
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No or invalid credentials; the connection is refused before upgrade.
    #[error("unauthorized")]
    Unauthorized,
}
