use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use crate::broadcast::{RoomEvent, RoomRouter};
use crate::model::BookingDTO;

/// Entry point of the write-path into the realtime layer. Callers invoke it only after their
/// store write committed. Publishing is best-effort and has no error to return.
pub trait EventPublisher: Send + Sync {

    fn publish(&self, event: RoomEvent);

    fn booking_created(&self, booking: BookingDTO) {
        self.publish(RoomEvent::BookingCreated { booking });
    }

    fn booking_status_changed(&self, booking: BookingDTO) {
        self.publish(RoomEvent::BookingStatusChanged { booking });
    }

    fn property_availability_changed(&self, property_id: Uuid, available: bool) {
        self.publish(RoomEvent::PropertyAvailabilityChanged { property_id, available });
    }
}

pub struct RoomEventPublisher {
    router: Arc<RoomRouter>,
}

impl RoomEventPublisher {
    pub fn new(router: Arc<RoomRouter>) -> Self {
        Self { router }
    }
}

impl EventPublisher for RoomEventPublisher {
    fn publish(&self, event: RoomEvent) {
        let kind = event.kind();
        let report = self.router.publish(event);
        debug!(kind = kind.as_str(), delivered = report.delivered, dropped = report.dropped, "Realtime event published");
    }
}

#[cfg(test)]
mod tests {
    use crate::broadcast::{Notification, RoomKey};
    use crate::model::BookingStatus;
    use crate::test_support::booking_dto;
    use super::*;

    #[test]
    fn booking_status_change_targets_property_and_tenant() {
        let router = Arc::new(RoomRouter::new());
        let publisher = RoomEventPublisher::new(router.clone());
        let (property_id, tenant_id) = (Uuid::new_v4(), Uuid::new_v4());
        let (owner_view, mut owner_rx) = router.open_connection(4);
        let (tenant_view, mut tenant_rx) = router.open_connection(4);
        router.join(owner_view, RoomKey::property(property_id));
        router.join(tenant_view, RoomKey::user(tenant_id));

        publisher.booking_status_changed(booking_dto(property_id, tenant_id, BookingStatus::Approved));

        for rx in [&mut owner_rx, &mut tenant_rx] {
            let frame = rx.try_recv().unwrap();
            let notification: Notification = serde_json::from_str(&frame).unwrap();
            assert_eq!(notification.body.booking_status(), Some(BookingStatus::Approved));
        }
    }

    #[test]
    fn availability_change_only_reaches_the_listing_room() {
        let router = Arc::new(RoomRouter::new());
        let publisher = RoomEventPublisher::new(router.clone());
        let property_id = Uuid::new_v4();
        let (viewer, mut viewer_rx) = router.open_connection(4);
        let (other, mut other_rx) = router.open_connection(4);
        router.join(viewer, RoomKey::property(property_id));
        router.join(other, RoomKey::user(property_id));

        publisher.property_availability_changed(property_id, false);

        let frame = viewer_rx.try_recv().unwrap();
        let notification: Notification = serde_json::from_str(&frame).unwrap();
        assert_eq!(notification.body, RoomEvent::PropertyAvailabilityChanged { property_id, available: false });
        assert!(other_rx.try_recv().is_err());
    }
}
