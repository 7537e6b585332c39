//! Infrastructure layer: adapters for the domain ports and the wire DTOs.

pub mod auth;
pub mod directory;
pub mod dto;
pub mod repository;

pub use auth::StaticTokenAuthenticator;
pub use directory::StaticDirectory;
pub use repository::{InMemoryMessageLog, InMemoryRoomDirectory};
