//! Static token adapter for the identity port.
//!
//! The real deployment fronts an external identity service; this adapter maps
//! pre-shared tokens to participant identities, which is all the messaging
//! core needs for local runs and integration tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{AuthError, Authenticator, Identity, ParticipantId, Role};

/// `Authenticator` backed by a fixed token table.
#[derive(Debug, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a credential for a participant.
    pub fn insert_token(&mut self, token: String, participant_id: ParticipantId, role: Role) {
        self.tokens.insert(
            token,
            Identity {
                participant_id,
                role,
            },
        );
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::Unauthorized)
    }
}
