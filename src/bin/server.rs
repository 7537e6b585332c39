//! careline messaging server.
//!
//! Serves the websocket gateway plus the operational HTTP endpoints.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server -- --port 3001 \
//!     --token patient-secret=u1:patient \
//!     --token clinic-secret=u2:provider \
//!     --display-name u2="City Clinic"
//! ```

use std::sync::Arc;

use clap::Parser;

use careline::{
    ServerConfig,
    domain::{ParticipantId, Role},
    infrastructure::{InMemoryMessageLog, StaticDirectory, StaticTokenAuthenticator},
    logger::setup_logger,
    ui::state::AppState,
};

#[derive(Debug, Parser)]
#[command(name = "careline-server", about = "Room-scoped patient/provider messaging over WebSocket")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Pre-shared credential, repeatable: TOKEN=PARTICIPANT:ROLE
    /// (role is `patient` or `provider`)
    #[arg(long = "token", value_name = "TOKEN=PARTICIPANT:ROLE")]
    tokens: Vec<String>,

    /// Display name for the typing banner, repeatable: PARTICIPANT=NAME
    #[arg(long = "display-name", value_name = "PARTICIPANT=NAME")]
    display_names: Vec<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let mut authenticator = StaticTokenAuthenticator::new();
    for arg in &args.tokens {
        match parse_token_arg(arg) {
            Ok((token, participant_id, role)) => {
                authenticator.insert_token(token, participant_id, role);
            }
            Err(reason) => {
                tracing::error!("invalid --token '{arg}': {reason}");
                std::process::exit(2);
            }
        }
    }

    let mut directory = StaticDirectory::new();
    for arg in &args.display_names {
        match parse_name_arg(arg) {
            Ok((participant_id, name)) => directory.insert_name(participant_id, name),
            Err(reason) => {
                tracing::error!("invalid --display-name '{arg}': {reason}");
                std::process::exit(2);
            }
        }
    }

    let state = Arc::new(AppState::new(
        Arc::new(authenticator),
        Arc::new(directory),
        Arc::new(InMemoryMessageLog::new()),
    ));
    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };

    // Run the server
    if let Err(e) = careline::run_server(config, state).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

fn parse_token_arg(arg: &str) -> Result<(String, ParticipantId, Role), String> {
    let (token, rest) = arg
        .split_once('=')
        .ok_or_else(|| "expected TOKEN=PARTICIPANT:ROLE".to_string())?;
    let (participant, role) = rest
        .split_once(':')
        .ok_or_else(|| "expected PARTICIPANT:ROLE".to_string())?;
    let participant_id = ParticipantId::new(participant.to_string()).map_err(|e| e.to_string())?;
    let role = match role {
        "patient" => Role::Patient,
        "provider" => Role::Provider,
        other => return Err(format!("unknown role '{other}'")),
    };
    Ok((token.to_string(), participant_id, role))
}

fn parse_name_arg(arg: &str) -> Result<(ParticipantId, String), String> {
    let (participant, name) = arg
        .split_once('=')
        .ok_or_else(|| "expected PARTICIPANT=NAME".to_string())?;
    let participant_id = ParticipantId::new(participant.to_string()).map_err(|e| e.to_string())?;
    if name.is_empty() {
        return Err("display name cannot be empty".to_string());
    }
    Ok((participant_id, name.to_string()))
}
