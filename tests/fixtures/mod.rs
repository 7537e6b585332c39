//! Shared test fixtures.
//!
//! `TestServer` boots the real server on a caller-chosen port with a fixed
//! set of credentials: `u1` (patient), `u2` (provider, display name
//! "City Clinic") and `u3` (patient, a stranger to room `u1_u2`).

use std::{sync::Arc, time::Duration};

use careline::{
    ServerConfig,
    domain::{ParticipantId, Role},
    infrastructure::{InMemoryMessageLog, StaticDirectory, StaticTokenAuthenticator},
    logger::setup_logger,
    ui::state::AppState,
};

pub struct TestServer {
    port: u16,
}

impl TestServer {
    pub fn start(port: u16) -> Self {
        setup_logger("test-server", "warn");

        let mut authenticator = StaticTokenAuthenticator::new();
        for (token, participant, role) in [
            ("u1-token", "u1", Role::Patient),
            ("u2-token", "u2", Role::Provider),
            ("u3-token", "u3", Role::Patient),
        ] {
            authenticator.insert_token(
                token.to_string(),
                ParticipantId::new(participant.to_string()).unwrap(),
                role,
            );
        }

        let mut directory = StaticDirectory::new();
        directory.insert_name(
            ParticipantId::new("u2".to_string()).unwrap(),
            "City Clinic".to_string(),
        );

        let state = Arc::new(AppState::new(
            Arc::new(authenticator),
            Arc::new(directory),
            Arc::new(InMemoryMessageLog::new()),
        ));
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
        };

        tokio::spawn(async move {
            if let Err(e) = careline::run_server(config, state).await {
                panic!("test server failed to start: {e}");
            }
        });

        Self { port }
    }

    #[allow(dead_code)]
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    #[allow(dead_code)]
    pub fn ws_url(&self, token: &str) -> String {
        format!("ws://127.0.0.1:{}/ws?token={token}", self.port)
    }

    /// Block until the listener accepts connections.
    pub async fn wait_ready(&self) {
        for _ in 0..100 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("test server on port {} never became ready", self.port);
    }
}
