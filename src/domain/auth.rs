//! Identity port.
//!
//! Token issuance and credential storage belong to the surrounding
//! application; the messaging core only needs to map a connection's
//! credential to a stable participant identity before any event is accepted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{error::AuthError, value_object::ParticipantId};

/// Role of an authenticated participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Provider,
}

/// The identity an authenticator resolves a credential to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub participant_id: ParticipantId,
    pub role: Role,
}

/// Maps a connection credential to a participant identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for unknown or invalid credentials;
    /// the gateway refuses the connection before the websocket upgrade.
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError>;
}
