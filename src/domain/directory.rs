//! Directory port.
//!
//! Supplies display metadata for rendering only (the typing banner); protocol
//! logic never depends on it and falls back to the raw participant id.

use async_trait::async_trait;

use super::value_object::ParticipantId;

/// Display-name lookup for participants.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Human-readable name for the participant, if the directory knows one.
    async fn display_name(&self, participant_id: &ParticipantId) -> Option<String>;
}
