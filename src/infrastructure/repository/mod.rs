pub mod inmemory;

pub use inmemory::{InMemoryMessageLog, InMemoryRoomDirectory};
