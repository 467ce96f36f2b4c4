use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;
use crate::broadcast::{ConnectionId, RoomRouter};
use crate::client::transport::{Transport, TransportError, TransportLink};
use crate::realtime::apply_client_message;

/// Transport that attaches a client directly to an in-process [`RoomRouter`], with the same
/// frames and teardown semantics as the websocket route.
pub struct LocalTransport {
    router: Arc<RoomRouter>,
    buffer: usize,
    active: Arc<Mutex<Option<ConnectionId>>>,
    refuse: Arc<Mutex<bool>>,
}

impl LocalTransport {

    pub fn new(router: Arc<RoomRouter>) -> Self {
        LocalTransport {
            router,
            buffer: 64,
            active: Arc::new(Mutex::new(None)),
            refuse: Arc::new(Mutex::new(false)),
        }
    }

    /// Server-side id of the current connection, if one is open.
    pub fn active_connection(&self) -> Option<ConnectionId> {
        *lock(&self.active)
    }

    /// Tears the current connection down from the server side, like a network drop would.
    pub fn close_active_connection(&self) {
        if let Some(connection_id) = lock(&self.active).take() {
            debug!(%connection_id, "Closing local connection from the server side");
            self.router.close_connection(connection_id);
        }
    }

    /// While set, every connect attempt fails as if the server was unreachable.
    pub fn refuse_connections(&self, refuse: bool) {
        *lock(&self.refuse) = refuse;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Transport for LocalTransport {

    async fn connect(&self) -> Result<TransportLink, TransportError> {
        if *lock(&self.refuse) {
            return Err(TransportError::Connect { url: "local".to_string(), reason: "connection refused".to_string() });
        }

        let (connection_id, mut frames) = self.router.open_connection(self.buffer);
        *lock(&self.active) = Some(connection_id);

        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel::<String>();
        let (incoming_tx, incoming) = mpsc::unbounded_channel::<String>();

        // client -> server, ends when the client drops its sender
        let router = self.router.clone();
        let active = self.active.clone();
        tokio::spawn(async move {
            while let Some(text) = outgoing_rx.recv().await {
                apply_client_message(&router, connection_id, &text);
            }
            let mut active = lock(&active);
            if *active == Some(connection_id) {
                *active = None;
            }
            router.close_connection(connection_id);
        });

        // server -> client, ends when the router drops the connection
        tokio::spawn(async move {
            while let Some(frame) = frames.recv().await {
                if incoming_tx.send(frame.to_string()).is_err() {
                    break;
                }
            }
        });

        Ok(TransportLink { outgoing, incoming })
    }
}
