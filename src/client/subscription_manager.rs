use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use crate::broadcast::{ClientCommand, Notification, RoomKey};
use crate::client::config::ClientConfig;
use crate::client::transport::{Transport, TransportLink};
use crate::client::ws_transport::WsTransport;

pub type EventCallback = Arc<dyn Fn(&Notification) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenerScope {
    Bookings,
    Properties,
}

struct Subscription {
    id: SubscriptionId,
    callback: Option<EventCallback>,
}

struct KindListener {
    id: SubscriptionId,
    scope: ListenerScope,
    callback: EventCallback,
}

#[derive(Default)]
struct Session {
    rooms: BTreeMap<RoomKey, Vec<Subscription>>,
    listeners: Vec<KindListener>,
    outgoing: Option<UnboundedSender<String>>,
    cancellation: Option<CancellationToken>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    session: Mutex<Session>,
    state: watch::Sender<ConnectionState>,
    next_id: AtomicU64,
}

/// Client side of the realtime layer.
///
/// Keeps the set of rooms the local user cares about, holds one connection to the server and
/// replays every join after each (re)connect, since the server forgets memberships together
/// with the connection. Incoming events are dispatched on the connection task, in arrival
/// order, one call per event and callback.
///
/// Cloning yields another handle to the same manager.
#[derive(Clone)]
pub struct SubscriptionManager {
    inner: Arc<Inner>,
}

impl SubscriptionManager {

    pub fn new(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        SubscriptionManager {
            inner: Arc::new(Inner {
                transport,
                config,
                session: Mutex::new(Session::default()),
                state,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn websocket(config: ClientConfig) -> Self {
        let transport = Arc::new(WsTransport::new(config.url.clone()));
        Self::new(transport, config)
    }

    /// Starts the connection task. Does nothing while a connection task is already running.
    pub fn connect(&self) {
        let mut session = self.inner.session();
        if session.cancellation.is_some() {
            return;
        }
        let token = CancellationToken::new();
        session.cancellation = Some(token.clone());
        self.inner.set_state(ConnectionState::Connecting);
        drop(session);

        tokio::spawn(run(self.inner.clone(), token));
    }

    /// Closes the connection for good, no reconnect follows. Registered subscriptions stay and
    /// are replayed by a later `connect`.
    pub fn disconnect(&self) {
        let mut session = self.inner.session();
        if let Some(token) = session.cancellation.take() {
            token.cancel();
        }
        session.outgoing = None;
        self.inner.set_state(ConnectionState::Disconnected);
        info!("Realtime connection closed by the client");
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// Room keys the manager joins on every connect.
    pub fn subscription_intent(&self) -> BTreeSet<RoomKey> {
        self.inner.session().rooms.keys().copied().collect()
    }

    /// Registers `callback` for events of `room`. The join goes out right away when connected,
    /// otherwise with the next connect.
    pub fn subscribe(&self, room: RoomKey, callback: impl Fn(&Notification) + Send + Sync + 'static) -> SubscriptionId {
        self.add_subscription(room, Some(Arc::new(callback)))
    }

    /// Drops every callback of `room` and leaves it. Unknown rooms are ignored.
    pub fn unsubscribe(&self, room: &RoomKey) {
        let mut session = self.inner.session();
        if session.rooms.remove(room).is_none() {
            return;
        }
        if let Some(outgoing) = &session.outgoing {
            send_command(outgoing, ClientCommand::leave(*room));
        }
        debug!("Unsubscribed from {room}");
    }

    /// Removes a single room subscription or kind listener. The room is left once its last
    /// subscription is gone.
    pub fn remove_subscription(&self, id: SubscriptionId) {
        let mut session = self.inner.session();
        session.listeners.retain(|listener| listener.id != id);

        let Some(room) = session.rooms
            .iter()
            .find(|(_, subscriptions)| subscriptions.iter().any(|subscription| subscription.id == id))
            .map(|(room, _)| *room)
        else {
            return;
        };
        let now_empty = session.rooms.get_mut(&room).is_some_and(|subscriptions| {
            subscriptions.retain(|subscription| subscription.id != id);
            subscriptions.is_empty()
        });
        if now_empty {
            session.rooms.remove(&room);
            if let Some(outgoing) = &session.outgoing {
                send_command(outgoing, ClientCommand::leave(room));
            }
        }
    }

    /// Called when a property detail view mounts.
    pub fn join_property_room(&self, property_id: Uuid) -> SubscriptionId {
        self.add_subscription(RoomKey::property(property_id), None)
    }

    /// Called when a property detail view unmounts.
    pub fn leave_property_room(&self, property_id: Uuid) {
        self.unsubscribe(&RoomKey::property(property_id));
    }

    /// Called once the user is authenticated.
    pub fn join_user_bookings(&self, user_id: Uuid) -> SubscriptionId {
        self.add_subscription(RoomKey::user(user_id), None)
    }

    /// Fires once per booking event from any joined room.
    pub fn on_booking_update(&self, callback: impl Fn(&Notification) + Send + Sync + 'static) -> SubscriptionId {
        self.add_listener(ListenerScope::Bookings, Arc::new(callback))
    }

    /// Fires once per property event from any joined room.
    pub fn on_property_update(&self, callback: impl Fn(&Notification) + Send + Sync + 'static) -> SubscriptionId {
        self.add_listener(ListenerScope::Properties, Arc::new(callback))
    }

    fn add_subscription(&self, room: RoomKey, callback: Option<EventCallback>) -> SubscriptionId {
        let id = self.inner.next_subscription_id();
        let mut session = self.inner.session();
        let subscriptions = session.rooms.entry(room).or_default();
        let first = subscriptions.is_empty();
        subscriptions.push(Subscription { id, callback });
        if first {
            if let Some(outgoing) = &session.outgoing {
                send_command(outgoing, ClientCommand::join(room));
            }
            debug!("Subscribed to {room}");
        }
        id
    }

    fn add_listener(&self, scope: ListenerScope, callback: EventCallback) -> SubscriptionId {
        let id = self.inner.next_subscription_id();
        self.inner.session().listeners.push(KindListener { id, scope, callback });
        id
    }
}

impl Inner {

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_subscription_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!("Realtime connection {:?} -> {:?}", previous, state);
        }
    }

    /// Installs the new link and replays the joins under one lock, so a concurrent
    /// `subscribe` is either part of the replay or sends its own join.
    fn on_connected(&self, outgoing: UnboundedSender<String>, token: &CancellationToken) -> bool {
        let mut session = self.session();
        if token.is_cancelled() {
            return false;
        }
        for room in session.rooms.keys() {
            send_command(&outgoing, ClientCommand::join(*room));
        }
        info!("Realtime connection established, joined {} room(s)", session.rooms.len());
        session.outgoing = Some(outgoing);
        self.set_state(ConnectionState::Connected);
        true
    }

    fn on_transport_lost(&self, token: &CancellationToken) {
        let mut session = self.session();
        if token.is_cancelled() {
            return;
        }
        session.outgoing = None;
        self.set_state(ConnectionState::Reconnecting);
    }

    /// A cancelled task must not touch the state, it belongs to `disconnect` or to a newer task.
    fn enter_backoff(&self, token: &CancellationToken) -> bool {
        let _session = self.session();
        if token.is_cancelled() {
            return false;
        }
        self.set_state(ConnectionState::Reconnecting);
        true
    }

    fn finish(&self, token: &CancellationToken) {
        let mut session = self.session();
        if token.is_cancelled() {
            // an explicit disconnect already reset the session
            return;
        }
        session.cancellation = None;
        session.outgoing = None;
        self.set_state(ConnectionState::Disconnected);
    }

    fn dispatch(&self, text: &str) {
        let notification: Notification = match serde_json::from_str(text) {
            Ok(notification) => notification,
            Err(err) => {
                debug!("Dropping malformed event: {err}");
                return;
            }
        };

        let callbacks: Vec<EventCallback> = {
            let session = self.session();
            let scope = if notification.body.kind().is_booking() {
                ListenerScope::Bookings
            } else {
                ListenerScope::Properties
            };
            let room_callbacks = notification.rooms
                .iter()
                .filter_map(|room| session.rooms.get(room))
                .flatten()
                .filter_map(|subscription| subscription.callback.clone());
            let kind_callbacks = session.listeners
                .iter()
                .filter(|listener| listener.scope == scope)
                .map(|listener| listener.callback.clone());
            room_callbacks.chain(kind_callbacks).collect()
        };

        for callback in callbacks {
            callback(&notification);
        }
    }
}

fn send_command(outgoing: &UnboundedSender<String>, command: ClientCommand) {
    let text = match serde_json::to_string(&command) {
        Ok(text) => text,
        Err(err) => {
            error!("Unable to encode room command: {err}");
            return;
        }
    };
    if outgoing.send(text).is_err() {
        // the connection task notices the drop and replays on reconnect
        debug!("Connection gone, {:?} {} not sent", command.action, command.room);
    }
}

async fn run(inner: Arc<Inner>, token: CancellationToken) {
    let mut attempt: u32 = 0;

    loop {
        let connected = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = inner.transport.connect() => result,
        };

        match connected {
            Ok(TransportLink { outgoing, mut incoming }) => {
                if !inner.on_connected(outgoing, &token) {
                    break;
                }
                if attempt > 0 {
                    info!("Realtime connection restored after {attempt} attempt(s)");
                }
                attempt = 0;

                loop {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => break,
                        frame = incoming.recv() => match frame {
                            Some(text) => inner.dispatch(&text),
                            None => break,
                        },
                    }
                }
                if token.is_cancelled() {
                    break;
                }
                warn!("Realtime connection lost, reconnecting");
                inner.on_transport_lost(&token);
            }
            Err(err) if !err.is_retryable() => {
                error!("Realtime connection rejected: {err}");
                break;
            }
            Err(err) => {
                warn!("Realtime connection attempt failed: {err}");
            }
        }

        attempt = attempt.saturating_add(1);
        if inner.config.max_reconnect_attempts.is_some_and(|max| attempt > max) {
            error!("Giving up on the realtime connection after {} attempt(s)", attempt - 1);
            break;
        }
        if !inner.enter_backoff(&token) {
            break;
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = sleep(inner.config.backoff(attempt)) => {}
        }
    }

    inner.finish(&token);
}
