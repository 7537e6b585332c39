//! UseCase layer.
//!
//! The operations the gateway dispatches to: join, send, typing, disconnect.
//! Each one coordinates the connection registry, the room directory and the
//! message log; none of them knows about sockets.

pub mod disconnect_participant;
pub mod error;
pub mod join_room;
pub mod send_message;
pub mod typing;

pub use disconnect_participant::DisconnectUseCase;
pub use error::{JoinRoomError, SendMessageError};
pub use join_room::JoinRoomUseCase;
pub use send_message::SendMessageUseCase;
pub use typing::{TYPING_EXPIRY, TypingCoordinator};
