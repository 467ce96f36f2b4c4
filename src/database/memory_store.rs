use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::database::{MarketplaceStore, StoreError};
use crate::model::{Booking, BookingStatus, Property, PropertyStatus};

/// Process-local store, each collection guarded by its own `RwLock`.
#[derive(Default)]
pub struct InMemoryStore {
    properties: RwLock<HashMap<Uuid, Property>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketplaceStore for InMemoryStore {

    async fn insert_property(&self, property: Property) -> Result<Property, StoreError> {
        let mut lock = self.properties.write().await;
        if lock.contains_key(&property.id) {
            return Err(StoreError::Duplicate(property.id));
        }
        lock.insert(property.id, property.clone());
        debug!("Stored property {}", property.id);
        Ok(property)
    }

    async fn find_property(&self, property_id: &Uuid) -> Result<Option<Property>, StoreError> {
        let lock = self.properties.read().await;
        Ok(lock.get(property_id).cloned())
    }

    async fn update_property_status(
        &self,
        property_id: &Uuid,
        status: PropertyStatus
    ) -> Result<Option<(PropertyStatus, Property)>, StoreError> {
        let mut lock = self.properties.write().await;
        let Some(property) = lock.get_mut(property_id) else {
            return Ok(None);
        };
        let previous = property.status;
        property.status = status;
        property.updated_at = Utc::now();
        Ok(Some((previous, property.clone())))
    }

    async fn insert_booking(&self, booking: Booking) -> Result<Booking, StoreError> {
        let mut lock = self.bookings.write().await;
        if lock.contains_key(&booking.id) {
            return Err(StoreError::Duplicate(booking.id));
        }
        lock.insert(booking.id, booking.clone());
        debug!("Stored booking {} for property {}", booking.id, booking.property_id);
        Ok(booking)
    }

    async fn find_booking(&self, booking_id: &Uuid) -> Result<Option<Booking>, StoreError> {
        let lock = self.bookings.read().await;
        Ok(lock.get(booking_id).cloned())
    }

    async fn find_bookings_by_tenant(
        &self,
        tenant_id: &Uuid,
        status: Option<BookingStatus>
    ) -> Result<Vec<Booking>, StoreError> {
        let lock = self.bookings.read().await;
        let mut bookings: Vec<Booking> = lock
            .values()
            .filter(|booking| booking.tenant_id == *tenant_id)
            .filter(|booking| status.is_none_or(|status| booking.status == status))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn update_booking_status(
        &self,
        booking_id: &Uuid,
        status: BookingStatus
    ) -> Result<Option<Booking>, StoreError> {
        let mut lock = self.bookings.write().await;
        let Some(booking) = lock.get_mut(booking_id) else {
            return Ok(None);
        };
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(Some(booking.clone()))
    }
}
