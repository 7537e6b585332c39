//! Typing Coordinator: debounced per-room typing state.
//!
//! Rapid keystroke events from a client collapse into a single
//! `typing-started` broadcast; a quiet period (or an explicit stop) produces
//! exactly one `typing-stopped`. One cancellable timer task exists per
//! (room, participant); re-arming aborts the previous task instead of
//! stacking callbacks.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    domain::{Directory, ParticipantId, RoomId},
    infrastructure::dto::websocket::ServerEvent,
    time::now_utc_millis,
    ui::state::ConnectionRegistry,
};

/// Quiet period after the last typing event before the indicator self-clears.
/// Matches the timeout the chat client already applies on its side.
pub const TYPING_EXPIRY: Duration = Duration::from_secs(2);

#[derive(Debug)]
struct TypingEntry {
    timer: JoinHandle<()>,
    last_activity: i64,
}

struct Inner {
    registry: Arc<ConnectionRegistry>,
    directory: Arc<dyn Directory>,
    expiry: Duration,
    entries: Mutex<HashMap<(RoomId, ParticipantId), TypingEntry>>,
}

/// Ephemeral typing state, keyed by (room, participant). Nothing here is
/// persisted; a restart simply clears all indicators.
pub struct TypingCoordinator {
    inner: Arc<Inner>,
}

impl TypingCoordinator {
    pub fn new(registry: Arc<ConnectionRegistry>, directory: Arc<dyn Directory>) -> Self {
        Self::with_expiry(registry, directory, TYPING_EXPIRY)
    }

    /// Construct with a custom quiet period. Used by tests.
    pub fn with_expiry(
        registry: Arc<ConnectionRegistry>,
        directory: Arc<dyn Directory>,
        expiry: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                directory,
                expiry,
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Mark the participant as typing "now" and (re)arm the expiry timer.
    ///
    /// Broadcasts `typing-started` to the counterpart only on the
    /// not-typing → typing transition; repeated calls inside the window are
    /// silent.
    pub async fn notify_typing(&self, room_id: RoomId, participant: ParticipantId) {
        let key = (room_id.clone(), participant.clone());
        let newly_started = {
            let mut entries = self.inner.entries.lock().await;
            let newly_started = match entries.remove(&key) {
                Some(previous) => {
                    previous.timer.abort();
                    false
                }
                None => true,
            };

            let timer = {
                let inner = Arc::clone(&self.inner);
                let room_id = room_id.clone();
                let participant = participant.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(inner.expiry).await;
                    inner.expire(room_id, participant).await;
                })
            };
            entries.insert(
                key,
                TypingEntry {
                    timer,
                    last_activity: now_utc_millis(),
                },
            );
            newly_started
        };

        if newly_started {
            self.inner.broadcast(&room_id, &participant, true).await;
        }
    }

    /// Cancel the timer and broadcast `typing-stopped` if currently typing.
    /// Called on message send and when the participant's last connection in
    /// the room detaches.
    pub async fn stop_typing(&self, room_id: &RoomId, participant: &ParticipantId) {
        let was_typing = {
            let mut entries = self.inner.entries.lock().await;
            match entries.remove(&(room_id.clone(), participant.clone())) {
                Some(entry) => {
                    entry.timer.abort();
                    true
                }
                None => false,
            }
        };

        if was_typing {
            self.inner.broadcast(room_id, participant, false).await;
        }
    }

    pub async fn is_typing(&self, room_id: &RoomId, participant: &ParticipantId) -> bool {
        let entries = self.inner.entries.lock().await;
        entries.contains_key(&(room_id.clone(), participant.clone()))
    }

    /// Milliseconds-UTC timestamp of the participant's last typing event.
    pub async fn last_activity(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
    ) -> Option<i64> {
        let entries = self.inner.entries.lock().await;
        entries
            .get(&(room_id.clone(), participant.clone()))
            .map(|entry| entry.last_activity)
    }
}

impl Inner {
    /// Timer callback: the quiet period elapsed with no further activity.
    async fn expire(&self, room_id: RoomId, participant: ParticipantId) {
        let was_typing = {
            let mut entries = self.entries.lock().await;
            entries
                .remove(&(room_id.clone(), participant.clone()))
                .is_some()
        };

        if was_typing {
            self.broadcast(&room_id, &participant, false).await;
        }
    }

    /// Push the typing banner to every connection of the counterpart. The
    /// typist's own connections are excluded: their client renders its own
    /// state.
    async fn broadcast(&self, room_id: &RoomId, typist: &ParticipantId, started: bool) {
        let message = if started {
            let name = self
                .directory
                .display_name(typist)
                .await
                .unwrap_or_else(|| typist.to_string());
            format!("{name} is typing")
        } else {
            String::new()
        };
        let frame = serde_json::to_string(&ServerEvent::ResponseTyping { message }).unwrap();

        for (connection_id, participant_id) in self.registry.connections_in_room(room_id).await {
            if &participant_id == typist {
                continue;
            }
            if !self.registry.send_to(&connection_id, frame.clone()).await {
                tracing::warn!("failed to deliver typing state to connection '{connection_id}'");
            }
        }
    }
}
