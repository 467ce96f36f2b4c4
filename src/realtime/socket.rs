use std::sync::Arc;
use std::time::Instant;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::time::interval;
use tracing::{debug, info, warn};
use crate::broadcast::{ClientCommand, ConnectionId, RoomAction, RoomRouter};
use crate::core::AppState;

struct ConnectionGuard {
    connection_id: ConnectionId,
    router: Arc<RoomRouter>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) { //runs exactly once per socket, whichever way the loop ends
        self.router.close_connection(self.connection_id);
    }
}

pub async fn upgrade_socket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let router = state.room_router.clone();
    let (connection_id, mut outbound) = router.open_connection(state.env.connection_buffer);
    let _guard = ConnectionGuard { connection_id, router: router.clone() };

    let (mut sink, mut stream) = socket.split();
    let heartbeat_timeout = state.env.heartbeat_timeout();
    let mut heartbeat = interval(state.env.heartbeat_interval());
    let mut last_seen = Instant::now();

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                let Some(frame) = frame else { break };
                if let Err(err) = sink.send(Message::Text(frame.to_string().into())).await {
                    debug!(%connection_id, "Unable to write to socket: {err}");
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        last_seen = Instant::now();
                        apply_client_message(&router, connection_id, text.as_str());
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(%connection_id, "Client closed the socket");
                        break;
                    }
                    Some(Ok(_)) => {
                        last_seen = Instant::now();
                    }
                    Some(Err(err)) => {
                        debug!(%connection_id, "Socket error: {err}");
                        break;
                    }
                }
            }
            _ = heartbeat.tick() => {
                if last_seen.elapsed() > heartbeat_timeout {
                    info!(%connection_id, "No heartbeat within {:?}, dropping connection", heartbeat_timeout);
                    break;
                }
                if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Applies one client frame to the room membership. Unparseable frames are ignored.
pub fn apply_client_message(router: &RoomRouter, connection_id: ConnectionId, text: &str) {
    let command: ClientCommand = match serde_json::from_str(text) {
        Ok(command) => command,
        Err(err) => {
            warn!(%connection_id, "Ignoring malformed client frame: {err}");
            return;
        }
    };
    match command.action {
        RoomAction::Join => {
            router.join(connection_id, command.room);
        }
        RoomAction::Leave => {
            router.leave(connection_id, &command.room);
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use crate::broadcast::RoomKey;
    use super::*;

    #[test]
    fn join_and_leave_frames_update_membership() {
        let router = RoomRouter::new();
        let (connection_id, _rx) = router.open_connection(4);
        let room = RoomKey::property(Uuid::new_v4());

        apply_client_message(&router, connection_id, &format!(r#"{{"action":"join","room":"{room}"}}"#));
        assert!(router.registry().members_of(&room).contains(&connection_id));

        apply_client_message(&router, connection_id, &format!(r#"{{"action":"leave","room":"{room}"}}"#));
        assert!(router.registry().members_of(&room).is_empty());
    }

    #[test]
    fn malformed_frames_are_ignored() {
        let router = RoomRouter::new();
        let (connection_id, _rx) = router.open_connection(4);

        apply_client_message(&router, connection_id, "not json");
        apply_client_message(&router, connection_id, r#"{"action":"join","room":"hotel:1"}"#);
        apply_client_message(&router, connection_id, r#"{"action":"shout","room":"user:1"}"#);

        assert!(router.registry().rooms_of(connection_id).is_empty());
    }
}
