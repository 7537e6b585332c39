//! Persistence port of the domain layer.
//!
//! The message log is the only durable shared resource in the subsystem.
//! The trait keeps the usecases independent of the storage backend; the
//! in-memory implementation lives in the infrastructure layer and a
//! database-backed one can be swapped in without touching callers.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{
    entity::StoredMessage,
    error::MessageLogError,
    value_object::{MessageBody, ParticipantId, RoomId},
};

/// Append-only, per-room message persistence.
///
/// No update or delete operations exist: the log is append-only so the
/// communication trail stays auditable.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Persist a message, assigning a server timestamp strictly greater than
    /// the previous message of the room and the next insertion sequence.
    ///
    /// # Errors
    ///
    /// Returns `MessageLogError::StorageFailure` on a persistence error;
    /// callers must not broadcast anything in that case.
    async fn append(
        &self,
        room_id: RoomId,
        sender: ParticipantId,
        receiver: ParticipantId,
        body: MessageBody,
    ) -> Result<StoredMessage, MessageLogError>;

    /// Messages of a room in ascending creation order.
    ///
    /// `limit` caps the result to the most recent N messages while keeping
    /// ascending order. Used at join time to hydrate a new connection.
    async fn history(
        &self,
        room_id: &RoomId,
        limit: Option<usize>,
    ) -> Result<Vec<StoredMessage>, MessageLogError>;
}
