#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use chrono::{Duration as DateDuration, Utc};
use uuid::Uuid;
use rentals_realtime::bookings::booking_service::BookingService;
use rentals_realtime::broadcast::{Notification, RoomKey, RoomRouter};
use rentals_realtime::client::{ClientConfig, ConnectionState, LocalTransport, SubscriptionManager};
use rentals_realtime::core::{AppState, RealtimeConfig};
use rentals_realtime::model::{BookingDTO, Location, NewBooking, NewProperty, Property, UtilityIncluded};
use rentals_realtime::properties::property_service::PropertyService;

pub fn fast_config() -> ClientConfig {
    ClientConfig { initial_backoff_ms: 5, max_backoff_ms: 20, ..ClientConfig::new("local") }
}

/// Polls until `condition` holds, panics after about two seconds.
pub async fn eventually(condition: impl FnMut() -> bool) {
    eventually_within(Duration::from_secs(2), condition).await;
}

pub async fn eventually_within(limit: Duration, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(condition(), "condition not reached within {limit:?}");
}

pub struct Client {
    pub transport: Arc<LocalTransport>,
    pub manager: SubscriptionManager,
}

impl Client {

    pub fn attach(router: &Arc<RoomRouter>) -> Self {
        let transport = Arc::new(LocalTransport::new(router.clone()));
        let manager = SubscriptionManager::new(transport.clone(), fast_config());
        Client { transport, manager }
    }

    pub async fn connected(router: &Arc<RoomRouter>) -> Self {
        let client = Self::attach(router);
        client.manager.connect();
        eventually(|| client.manager.state() == ConnectionState::Connected).await;
        client
    }

    /// True once the server side of the current connection sits in every room of the intent.
    pub fn in_sync(&self, router: &RoomRouter) -> bool {
        let Some(connection) = self.transport.active_connection() else {
            return false;
        };
        router.registry().rooms_of(connection) == self.manager.subscription_intent().into_iter().collect::<HashSet<_>>()
    }

    pub async fn synced(&self, router: &RoomRouter) {
        eventually(|| self.in_sync(router)).await;
    }
}

/// Collects every dispatch of the callbacks it hands out.
#[derive(Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl Recorder {

    pub fn callback(&self) -> impl Fn(&Notification) + Send + Sync + 'static {
        let seen = self.seen.clone();
        move |notification: &Notification| seen.lock().unwrap().push(notification.clone())
    }

    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

pub fn subscribe_recorder(manager: &SubscriptionManager, room: RoomKey) -> Recorder {
    let recorder = Recorder::default();
    manager.subscribe(room, recorder.callback());
    recorder
}

pub fn marketplace() -> Arc<AppState> {
    Arc::new(AppState::new(RealtimeConfig::default()))
}

/// Registers an available listing through the write-path.
pub async fn listing(state: &Arc<AppState>, owner: Uuid) -> Property {
    let new_property = NewProperty {
        title: "Two room flat".to_string(),
        description: "Bright, close to the park".to_string(),
        price: 1200.0,
        location: Location {
            address: "Hauptstrasse 1".to_string(),
            city: "Berlin".to_string(),
            state: "Berlin".to_string(),
            country: "Germany".to_string(),
            zip_code: Some("10115".to_string()),
        },
        images: Vec::new(),
    };
    PropertyService::register_property(state.clone(), owner, new_property).await.unwrap()
}

/// Files a pending application of `tenant` through the write-path.
pub async fn apply(state: &Arc<AppState>, tenant: Uuid, property_id: Uuid) -> BookingDTO {
    let new_booking = NewBooking {
        property: property_id,
        move_in_date: Utc::now() + DateDuration::days(30),
        lease_duration: 12,
        monthly_rent: 1200.0,
        security_deposit: 2400.0,
        tenant_details: None,
        utility_included: UtilityIncluded::default(),
        special_requests: None,
        contact_number: "+49 170 000000".to_string(),
    };
    BookingService::create_booking(state.clone(), tenant, new_booking).await.unwrap()
}
