//! In-memory room directory.
//!
//! Owns the mapping from room id to its `Room` record (member pair, attached
//! connections, creation timestamp) and hands out the per-room serialization
//! lock. Presence is process-lifetime state: a restart loses who is attached
//! but never loses persisted messages.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, ParticipantId, Room, RoomError, RoomId, RoomState, Timestamp},
    time::now_utc_millis,
};

/// Directory of all rooms this process has seen since start.
#[derive(Debug, Default)]
pub struct InMemoryRoomDirectory {
    rooms: Mutex<HashMap<RoomId, Room>>,
    /// One lock per room: all sends (and joins) of a room serialize through
    /// it, so unrelated rooms never contend.
    send_locks: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

impl InMemoryRoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The serialization point for a room. Created on first use.
    pub async fn send_lock(&self, room_id: &RoomId) -> Arc<Mutex<()>> {
        let mut locks = self.send_locks.lock().await;
        locks
            .entry(room_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Attach a connection, creating the room record on first join.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::Forbidden` if the participant is not one of the
    /// room's two designated members; the room record is still created so the
    /// legitimate pair's later joins see a consistent creation timestamp.
    pub async fn join(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
        connection_id: ConnectionId,
    ) -> Result<Room, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), Timestamp::new(now_utc_millis())));
        room.attach(participant, connection_id)?;
        Ok(room.clone())
    }

    /// Detach a connection; returns the room state afterwards.
    pub async fn detach(&self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<RoomState> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id)?;
        room.detach(connection_id);
        Some(room.state())
    }

    pub async fn get(&self, room_id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    /// Every room known to this process, active or idle.
    pub async fn list(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut list: Vec<Room> = rooms.values().cloned().collect();
        list.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        list
    }
}
