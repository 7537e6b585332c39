//! In-memory implementations of the storage-facing components.

pub mod message_log;
pub mod room;

pub use message_log::InMemoryMessageLog;
pub use room::InMemoryRoomDirectory;
