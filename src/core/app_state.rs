use std::sync::Arc;
use crate::broadcast::{EventPublisher, RoomEventPublisher, RoomRouter};
use crate::core::RealtimeConfig;
use crate::database::{InMemoryStore, MarketplaceStore};

#[derive(Clone)]
pub struct AppState {
    pub env: RealtimeConfig,
    pub store: Arc<dyn MarketplaceStore>,
    pub room_router: Arc<RoomRouter>,
    pub publisher: Arc<dyn EventPublisher>,
}

impl AppState {

    /// Wires the room router, the publisher on top of it and the in-memory store.
    pub fn new(env: RealtimeConfig) -> Self {
        let room_router = Arc::new(RoomRouter::new());
        let publisher = Arc::new(RoomEventPublisher::new(room_router.clone()));
        Self {
            env,
            store: Arc::new(InMemoryStore::new()),
            room_router,
            publisher,
        }
    }
}
