use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;
use crate::model::{Booking, BookingStatus, Property, PropertyStatus};

#[derive(Debug, Error)]
pub enum StoreError {

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Duplicate id: {0}")]
    Duplicate(Uuid),
}

/// Document store for listings and rental applications. Every write returns once it has
/// committed, realtime events are published only after that.
#[async_trait]
pub trait MarketplaceStore: Send + Sync {

    async fn insert_property(&self, property: Property) -> Result<Property, StoreError>;

    async fn find_property(&self, property_id: &Uuid) -> Result<Option<Property>, StoreError>;

    /// Returns the status before the write together with the updated listing.
    async fn update_property_status(
        &self,
        property_id: &Uuid,
        status: PropertyStatus
    ) -> Result<Option<(PropertyStatus, Property)>, StoreError>;

    async fn insert_booking(&self, booking: Booking) -> Result<Booking, StoreError>;

    async fn find_booking(&self, booking_id: &Uuid) -> Result<Option<Booking>, StoreError>;

    /// Newest applications first.
    async fn find_bookings_by_tenant(
        &self,
        tenant_id: &Uuid,
        status: Option<BookingStatus>
    ) -> Result<Vec<Booking>, StoreError>;

    async fn update_booking_status(
        &self,
        booking_id: &Uuid,
        status: BookingStatus
    ) -> Result<Option<Booking>, StoreError>;
}
