//! Domain layer for the messaging subsystem.
//!
//! This module contains business rules that are independent of data transfer
//! objects and infrastructure concerns: validated value objects, the room and
//! message entities, and the ports the usecases depend on.

pub mod auth;
pub mod directory;
pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use auth::{Authenticator, Identity, Role};
pub use directory::Directory;
pub use entity::{Room, RoomState, StoredMessage};
pub use error::{AuthError, MessageLogError, RoomError, ValueObjectError};
pub use repository::MessageLog;
pub use value_object::{ConnectionId, MessageBody, ParticipantId, RoomId, Timestamp};

#[cfg(test)]
pub use repository::MockMessageLog;
