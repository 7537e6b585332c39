//! Static adapter for the directory port.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Directory, ParticipantId};

/// `Directory` backed by a fixed name table.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    names: HashMap<ParticipantId, String>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_name(&mut self, participant_id: ParticipantId, display_name: String) {
        self.names.insert(participant_id, display_name);
    }
}

#[async_trait]
impl Directory for StaticDirectory {
    async fn display_name(&self, participant_id: &ParticipantId) -> Option<String> {
        self.names.get(participant_id).cloned()
    }
}
