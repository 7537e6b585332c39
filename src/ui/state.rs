//! Server state and connection management.

use std::{collections::HashMap, sync::Arc};

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{Authenticator, ConnectionId, Directory, MessageLog, ParticipantId, Role, RoomId},
    infrastructure::InMemoryRoomDirectory,
    time::now_utc_millis,
    usecase::TypingCoordinator,
};

/// Query parameters for the WebSocket upgrade request
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub token: String,
}

/// Errors raised by the connection registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A connection id collided with a live entry. Ids are generated
    /// server-side; a collision is a server bug, not a client condition.
    #[error("duplicate connection id '{0}'")]
    DuplicateConnection(String),

    /// An operation referenced a connection the registry does not know.
    #[error("connection '{0}' is not registered")]
    NotRegistered(String),
}

/// One live connection: identity, outbound channel, current room, liveness.
#[derive(Debug)]
pub struct ClientInfo {
    /// Owning participant
    pub participant_id: ParticipantId,
    pub role: Role,
    /// Serialized outbound frames are enqueued here; the gateway's writer
    /// task drains the channel into the socket.
    pub sender: mpsc::UnboundedSender<String>,
    /// Room the connection is currently attached to, if any
    pub room: Option<RoomId>,
    /// Unix timestamp (milliseconds, UTC) when the connection registered
    pub connected_at: i64,
    /// Unix timestamp (milliseconds, UTC) of the last inbound event
    pub last_seen: i64,
}

/// Registry of every live connection, keyed by connection id.
///
/// Created on connect, destroyed on disconnect; injected into every component
/// that needs to address a connection. There is no other way to reach a
/// socket.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, ClientInfo>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new connection entry.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateConnection` if the id is already
    /// live. Should not happen with server-generated ids.
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        participant_id: ParticipantId,
        role: Role,
        sender: mpsc::UnboundedSender<String>,
    ) -> Result<(), RegistryError> {
        let mut connections = self.connections.lock().await;
        if connections.contains_key(&connection_id) {
            return Err(RegistryError::DuplicateConnection(
                connection_id.to_string(),
            ));
        }
        let now = now_utc_millis();
        connections.insert(
            connection_id,
            ClientInfo {
                participant_id,
                role,
                sender,
                room: None,
                connected_at: now,
                last_seen: now,
            },
        );
        Ok(())
    }

    /// Point the connection at a room; returns the previously attached room
    /// so the caller can detach it (a connection is attached to at most one
    /// room at a time).
    pub async fn attach(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<Option<RoomId>, RegistryError> {
        let mut connections = self.connections.lock().await;
        let info = connections
            .get_mut(connection_id)
            .ok_or_else(|| RegistryError::NotRegistered(connection_id.to_string()))?;
        Ok(info.room.replace(room_id))
    }

    /// Clear the connection's room; returns the room it was attached to.
    pub async fn detach(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let mut connections = self.connections.lock().await;
        connections.get_mut(connection_id)?.room.take()
    }

    /// Remove the entry entirely; returns the participant and the room the
    /// connection was attached to so presence can be recomputed. The room and
    /// its messages are untouched.
    pub async fn unregister(
        &self,
        connection_id: &ConnectionId,
    ) -> Option<(ParticipantId, Option<RoomId>)> {
        let mut connections = self.connections.lock().await;
        let info = connections.remove(connection_id)?;
        Some((info.participant_id, info.room))
    }

    /// Connections currently attached to the room, ordered by connection id.
    pub async fn connections_in_room(
        &self,
        room_id: &RoomId,
    ) -> Vec<(ConnectionId, ParticipantId)> {
        let connections = self.connections.lock().await;
        let mut in_room: Vec<(ConnectionId, ParticipantId)> = connections
            .iter()
            .filter(|(_, info)| info.room.as_ref() == Some(room_id))
            .map(|(id, info)| (id.clone(), info.participant_id.clone()))
            .collect();
        in_room.sort_by(|a, b| a.0.cmp(&b.0));
        in_room
    }

    /// How many of the participant's connections are attached to the room.
    pub async fn participant_connections_in_room(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
    ) -> usize {
        let connections = self.connections.lock().await;
        connections
            .values()
            .filter(|info| {
                info.room.as_ref() == Some(room_id) && &info.participant_id == participant_id
            })
            .count()
    }

    /// Room the connection is currently attached to.
    pub async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let connections = self.connections.lock().await;
        connections.get(connection_id)?.room.clone()
    }

    /// Enqueue a serialized frame to one connection. Returns false if the
    /// connection is gone or its channel is closed.
    pub async fn send_to(&self, connection_id: &ConnectionId, frame: String) -> bool {
        let connections = self.connections.lock().await;
        match connections.get(connection_id) {
            Some(info) => info.sender.send(frame).is_ok(),
            None => false,
        }
    }

    /// Refresh the liveness timestamp. Called on every inbound event.
    pub async fn touch(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        if let Some(info) = connections.get_mut(connection_id) {
            info.last_seen = now_utc_millis();
        }
    }

    pub async fn count(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }
}

/// Shared application state handed to the axum router.
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub rooms: Arc<InMemoryRoomDirectory>,
    pub message_log: Arc<dyn MessageLog>,
    pub authenticator: Arc<dyn Authenticator>,
    pub typing: Arc<TypingCoordinator>,
}

impl AppState {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        directory: Arc<dyn Directory>,
        message_log: Arc<dyn MessageLog>,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let typing = Arc::new(TypingCoordinator::new(registry.clone(), directory));
        Self {
            registry,
            rooms: Arc::new(InMemoryRoomDirectory::new()),
            message_log,
            authenticator,
            typing,
        }
    }
}
