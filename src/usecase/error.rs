//! UseCase layer error definitions.
//!
//! These are the failures the gateway turns into wire `error` events. Every
//! variant is local to the originating connection; none of them disturb the
//! other participant's session.

use thiserror::Error;

use crate::{
    domain::{MessageLogError, RoomError, ValueObjectError},
    ui::state::RegistryError,
};

/// Failures of the join operation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinRoomError {
    /// The participant is not one of the room's two designated members.
    #[error(transparent)]
    Forbidden(#[from] RoomError),

    /// History could not be read.
    #[error(transparent)]
    Storage(#[from] MessageLogError),

    /// The connection vanished between registration and join.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Failures of the send operation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Blank or whitespace-only body; nothing is persisted or broadcast.
    #[error("message body cannot be empty")]
    EmptyMessage,

    /// Body failed validation for another reason (too long).
    #[error(transparent)]
    InvalidBody(ValueObjectError),

    /// The connection has not joined the room it is sending to.
    #[error("connection is not attached to room '{0}'")]
    NotAttached(String),

    /// The (sender, receiver) pair does not match the room's members.
    #[error("sender/receiver pair does not match the members of room '{0}'")]
    Forbidden(String),

    /// Persistence failed; nothing was broadcast.
    #[error(transparent)]
    Storage(#[from] MessageLogError),
}
