mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::connect_async;
use uuid::Uuid;
use rentals_realtime::broadcast::{RoomEvent, RoomKey};
use rentals_realtime::client::{ClientConfig, ConnectionState, SubscriptionManager};
use rentals_realtime::core::{AppState, RealtimeConfig};
use rentals_realtime::model::PropertyStatus;
use rentals_realtime::properties::property_service::PropertyService;
use rentals_realtime::router::init_router;
use common::{eventually, eventually_within, listing, subscribe_recorder};

async fn serve(config: RealtimeConfig) -> (Arc<AppState>, SocketAddr) {
    let state = Arc::new(AppState::new(config));
    let app = init_router(state.as_ref().clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (state, addr)
}

fn ws_client(addr: SocketAddr) -> SubscriptionManager {
    let config = ClientConfig {
        initial_backoff_ms: 10,
        max_backoff_ms: 50,
        ..ClientConfig::new(format!("ws://{addr}/api/ws"))
    };
    SubscriptionManager::websocket(config)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn socket_joins_receives_and_tears_down() {
    let (state, addr) = serve(RealtimeConfig::default()).await;
    let owner = Uuid::new_v4();
    let property = listing(&state, owner).await;
    let room = RoomKey::property(property.id);

    let manager = ws_client(addr);
    let feed = subscribe_recorder(&manager, room);
    manager.connect();
    eventually(|| manager.state() == ConnectionState::Connected).await;
    eventually(|| state.room_router.registry().members_of(&room).len() == 1).await;

    PropertyService::change_status(state.clone(), owner, property.id, PropertyStatus::Maintenance).await.unwrap();

    eventually(|| feed.count() == 1).await;
    assert_eq!(feed.seen()[0].body, RoomEvent::PropertyAvailabilityChanged { property_id: property.id, available: false });

    manager.disconnect();
    eventually(|| state.room_router.registry().connection_count() == 0).await;
    assert!(state.room_router.registry().members_of(&room).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn leave_frame_removes_the_membership() {
    let (state, addr) = serve(RealtimeConfig::default()).await;
    let property_id = Uuid::new_v4();
    let room = RoomKey::property(property_id);

    let manager = ws_client(addr);
    manager.connect();
    eventually(|| manager.state() == ConnectionState::Connected).await;
    manager.join_property_room(property_id);
    eventually(|| state.room_router.registry().members_of(&room).len() == 1).await;

    manager.leave_property_room(property_id);
    eventually(|| state.room_router.registry().members_of(&room).is_empty()).await;
    assert_eq!(state.room_router.registry().connection_count(), 1);
    manager.disconnect();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn silent_socket_is_dropped_after_the_heartbeat_timeout() {
    let config = RealtimeConfig { heartbeat_interval_secs: 1, heartbeat_timeout_secs: 2, ..RealtimeConfig::default() };
    let (state, addr) = serve(config).await;
    let registry = state.room_router.registry().clone();

    let responsive = ws_client(addr);
    responsive.connect();
    eventually(|| registry.connection_count() == 1).await;

    // never polled, so pings are never answered
    let (_silent, _) = connect_async(format!("ws://{addr}/api/ws")).await.unwrap();
    eventually(|| registry.connection_count() == 2).await;

    eventually_within(Duration::from_secs(8), || registry.connection_count() == 1).await;
    assert_eq!(responsive.state(), ConnectionState::Connected);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(registry.connection_count(), 1);
    responsive.disconnect();
}
