use std::collections::HashSet;
use std::sync::Arc;
use dashmap::DashMap;
use log::{debug, info, warn};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::mpsc::error::TrySendError;
use crate::broadcast::{ConnectionId, ConnectionRegistry, Notification, RoomEvent, RoomKey};

/// Serialized frame handed to a connection's writer.
pub type Frame = Arc<str>;

/// Outcome of one fan-out. Informational only, a publish never fails.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub dropped: usize,
}

/// Fans events out to the members of their target rooms.
///
/// Each connection owns a bounded outbound queue. `publish` never awaits, it pushes the frame
/// into every member queue within the call, so two publishes reach a connection in call order.
/// A full or closed queue loses that one frame for that one connection.
pub struct RoomRouter {
    registry: Arc<ConnectionRegistry>,
    outlets: DashMap<ConnectionId, Sender<Frame>>,
}

impl RoomRouter {

    pub fn new() -> Self {
        Self::with_registry(Arc::new(ConnectionRegistry::new()))
    }

    pub fn with_registry(registry: Arc<ConnectionRegistry>) -> Self {
        RoomRouter {
            registry,
            outlets: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Registers a new connection and returns the receiving end of its outbound queue.
    pub fn open_connection(&self, buffer: usize) -> (ConnectionId, Receiver<Frame>) {
        let connection_id = ConnectionId::new();
        let (sender, receiver) = mpsc::channel::<Frame>(buffer.max(1));
        self.outlets.insert(connection_id, sender);
        self.registry.register(connection_id);
        info!("Connection {connection_id} opened, {} active.", self.outlets.len());
        (connection_id, receiver)
    }

    /// Transport teardown. Safe to call more than once, later calls do nothing.
    pub fn close_connection(&self, connection_id: ConnectionId) {
        let removed = self.outlets.remove(&connection_id).is_some();
        self.registry.drop_connection(connection_id);
        if removed {
            info!("Connection {connection_id} closed, {} active.", self.outlets.len());
        }
    }

    pub fn join(&self, connection_id: ConnectionId, room: RoomKey) -> bool {
        self.registry.join(connection_id, room)
    }

    pub fn leave(&self, connection_id: ConnectionId, room: &RoomKey) -> bool {
        self.registry.leave(connection_id, room)
    }

    pub fn publish(&self, event: RoomEvent) -> PublishReport {
        self.publish_notification(&Notification::new(event))
    }

    /// Delivers to every connection that is a member of at least one target room at call time,
    /// once per connection even if it sits in several of those rooms.
    pub fn publish_notification(&self, notification: &Notification) -> PublishReport {
        let mut recipients: HashSet<ConnectionId> = HashSet::new();
        for room in &notification.rooms {
            recipients.extend(self.registry.members_of(room));
        }

        let kind = notification.body.kind().as_str();
        if recipients.is_empty() {
            debug!("No listeners for {kind} in {:?}", notification.rooms);
            return PublishReport::default();
        }

        let frame: Frame = match serde_json::to_string(notification) {
            Ok(text) => Arc::from(text),
            Err(err) => {
                warn!("Unable to serialize {kind} event: {err}");
                return PublishReport::default();
            }
        };

        let mut report = PublishReport::default();
        for connection_id in recipients {
            if self.deliver(connection_id, frame.clone()) {
                report.delivered += 1;
            } else {
                report.dropped += 1;
            }
        }
        debug!("Published {kind}: {} delivered, {} dropped.", report.delivered, report.dropped);
        report
    }

    fn deliver(&self, connection_id: ConnectionId, frame: Frame) -> bool {
        let Some(sender) = self.outlets.get(&connection_id).map(|outlet| outlet.value().clone()) else {
            return false;
        };
        match sender.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Outbound queue of connection {connection_id} is full, skipping event.");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Connection {connection_id} is closing, skipping event.");
                false
            }
        }
    }
}

impl Default for RoomRouter {
    fn default() -> Self {
        Self::new()
    }
}
