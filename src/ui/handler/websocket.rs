//! Gateway Protocol Handler: websocket termination and event dispatch.
//!
//! The only component aware of the transport. Authenticates before upgrade,
//! registers the connection, then translates the inbound event kinds
//! (`joinRoom`, `typing`, `sendMessage`, disconnect) into usecase calls.
//! Validation failures produce an `error` event to the originating connection
//! only; a malformed event never closes the socket.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{AuthError, ConnectionId, Identity, ParticipantId, RoomId},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::state::{AppState, ConnectQuery},
    usecase::{DisconnectUseCase, JoinRoomUseCase, SendMessageUseCase},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Identity is resolved before the upgrade; an unknown credential never
    // gets a socket.
    let identity = match state.authenticator.authenticate(&query.token).await {
        Ok(identity) => identity,
        Err(AuthError::Unauthorized) => {
            tracing::warn!("refusing connection: invalid credential");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, identity: Identity) {
    let connection_id = ConnectionId::generate();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    if let Err(e) = state
        .registry
        .register(
            connection_id.clone(),
            identity.participant_id.clone(),
            identity.role,
            tx,
        )
        .await
    {
        // Connection ids are generated server-side; a collision is a bug,
        // not a client condition.
        tracing::error!("refusing connection: {e}");
        return;
    }
    tracing::info!(
        "participant '{}' ({:?}) connected as connection '{}'",
        identity.participant_id,
        identity.role,
        connection_id
    );

    let (mut sender, mut receiver) = socket.split();

    // Writer task: drain the connection's outbound queue into the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Reader task: inbound events until the peer goes away.
    let recv_state = state.clone();
    let recv_connection = connection_id.clone();
    let recv_identity = identity.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {e}");
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_event(&recv_state, &recv_connection, &recv_identity, &text).await;
                }
                Message::Ping(_) => {
                    // Ping/pong is handled by the protocol layer.
                }
                Message::Close(_) => {
                    tracing::info!("connection '{}' requested close", recv_connection);
                    break;
                }
                _ => {}
            }
        }
    });

    // If either half finishes, tear down the other.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let disconnect = DisconnectUseCase::new(
        state.registry.clone(),
        state.rooms.clone(),
        state.typing.clone(),
    );
    match disconnect.execute(&connection_id).await {
        Some((participant, room)) => {
            tracing::info!(
                "connection '{}' of participant '{}' disconnected (room: {})",
                connection_id,
                participant,
                room.map_or_else(|| "none".to_string(), |r| r.to_string())
            );
        }
        None => {
            tracing::warn!("connection '{}' was already gone at teardown", connection_id);
        }
    }
}

/// Dispatch one inbound frame. Every failure path ends in an `error` event to
/// this connection and nothing else.
async fn handle_event(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    identity: &Identity,
    text: &str,
) {
    state.registry.touch(connection_id).await;

    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("malformed event from '{connection_id}': {e}");
            emit_error(state, connection_id, "malformed event").await;
            return;
        }
    };

    match event {
        ClientEvent::JoinRoom { room_id } => {
            let Some(room_id) = parse_room_id(state, connection_id, room_id).await else {
                return;
            };

            let usecase = JoinRoomUseCase::new(
                state.registry.clone(),
                state.rooms.clone(),
                state.message_log.clone(),
                state.typing.clone(),
            );
            match usecase
                .execute(connection_id, &identity.participant_id, room_id.clone())
                .await
            {
                Ok(_room) => {
                    tracing::info!(
                        "participant '{}' joined room '{}' on connection '{}'",
                        identity.participant_id,
                        room_id,
                        connection_id
                    );
                }
                Err(e) => {
                    tracing::warn!("join of room '{room_id}' rejected: {e}");
                    emit_error(state, connection_id, &e.to_string()).await;
                }
            }
        }

        ClientEvent::Typing {
            room_id,
            sender,
            receiver: _,
        } => {
            if !sender_matches(state, connection_id, identity, &sender).await {
                return;
            }
            let Some(room_id) = parse_room_id(state, connection_id, room_id).await else {
                return;
            };

            // Precondition: attached to the room the event names.
            match state.registry.room_of(connection_id).await {
                Some(current) if current == room_id => {}
                _ => {
                    emit_error(state, connection_id, "not attached to room").await;
                    return;
                }
            }

            state
                .typing
                .notify_typing(room_id, identity.participant_id.clone())
                .await;
        }

        ClientEvent::SendMessage {
            room_id,
            sender,
            receiver,
            message,
        } => {
            if !sender_matches(state, connection_id, identity, &sender).await {
                return;
            }
            let Some(room_id) = parse_room_id(state, connection_id, room_id).await else {
                return;
            };
            let receiver = match ParticipantId::new(receiver) {
                Ok(receiver) => receiver,
                Err(e) => {
                    emit_error(state, connection_id, &e.to_string()).await;
                    return;
                }
            };

            let usecase = SendMessageUseCase::new(
                state.registry.clone(),
                state.rooms.clone(),
                state.message_log.clone(),
            );
            match usecase
                .execute(
                    connection_id,
                    room_id.clone(),
                    identity.participant_id.clone(),
                    receiver,
                    message,
                )
                .await
            {
                Ok(stored) => {
                    // Sending a message is an implicit "stopped typing".
                    state
                        .typing
                        .stop_typing(&room_id, &identity.participant_id)
                        .await;

                    let ack = serde_json::to_string(&ServerEvent::MessageSent {
                        message: stored.into(),
                    })
                    .unwrap();
                    state.registry.send_to(connection_id, ack).await;
                }
                Err(e) => {
                    tracing::warn!("send to room '{room_id}' rejected: {e}");
                    emit_error(state, connection_id, &e.to_string()).await;
                }
            }
        }
    }
}

/// The payload `sender` must be the authenticated participant; the gateway
/// does not let a connection speak for anyone else.
async fn sender_matches(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    identity: &Identity,
    sender: &str,
) -> bool {
    if sender == identity.participant_id.as_str() {
        return true;
    }
    tracing::warn!(
        "connection '{}' claimed sender '{}' but is authenticated as '{}'",
        connection_id,
        sender,
        identity.participant_id
    );
    emit_error(
        state,
        connection_id,
        "sender does not match authenticated participant",
    )
    .await;
    false
}

async fn parse_room_id(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    raw: String,
) -> Option<RoomId> {
    match RoomId::parse(raw) {
        Ok(room_id) => Some(room_id),
        Err(e) => {
            emit_error(state, connection_id, &e.to_string()).await;
            None
        }
    }
}

async fn emit_error(state: &Arc<AppState>, connection_id: &ConnectionId, reason: &str) {
    let frame = serde_json::to_string(&ServerEvent::Error {
        reason: reason.to_string(),
    })
    .unwrap();
    if !state.registry.send_to(connection_id, frame).await {
        tracing::warn!("failed to deliver error event to connection '{connection_id}'");
    }
}
