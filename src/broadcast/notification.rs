use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::broadcast::RoomKey;
use crate::model::{BookingDTO, BookingStatus};


/// Wire frame pushed to a connection: `{type, rooms, createdAt, ...eventFields}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(flatten)]
    pub body: RoomEvent,
    pub rooms: Vec<RoomKey>,
    pub created_at: DateTime<Utc>
}

impl Notification {

    pub fn new(body: RoomEvent) -> Self {
        let rooms = body.target_rooms();
        Notification {
            body,
            rooms,
            created_at: Utc::now()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum RoomEvent {

    /**
    * A rental application was stored, sent to the listing and to the applicant
    */
    #[serde(rename = "booking.created")]
    BookingCreated {booking: BookingDTO},

    /**
    * An application moved to another status, sent to the listing and to the applicant
    */
    #[serde(rename = "booking.statusChanged")]
    BookingStatusChanged {booking: BookingDTO},

    /**
    * A listing became (un)available, sent to everyone watching the listing
    */
    #[serde(rename = "property.availabilityChanged", rename_all = "camelCase")]
    PropertyAvailabilityChanged {property_id: Uuid, available: bool}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    BookingCreated,
    BookingStatusChanged,
    PropertyAvailabilityChanged
}

impl EventKind {

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::BookingCreated => "booking.created",
            EventKind::BookingStatusChanged => "booking.statusChanged",
            EventKind::PropertyAvailabilityChanged => "property.availabilityChanged"
        }
    }

    pub fn is_booking(&self) -> bool {
        matches!(self, EventKind::BookingCreated | EventKind::BookingStatusChanged)
    }
}

impl RoomEvent {

    pub fn kind(&self) -> EventKind {
        match self {
            RoomEvent::BookingCreated { .. } => EventKind::BookingCreated,
            RoomEvent::BookingStatusChanged { .. } => EventKind::BookingStatusChanged,
            RoomEvent::PropertyAvailabilityChanged { .. } => EventKind::PropertyAvailabilityChanged
        }
    }

    /// Booking events go to the listing and the applicant, availability only to the listing.
    pub fn target_rooms(&self) -> Vec<RoomKey> {
        match self {
            RoomEvent::BookingCreated { booking } | RoomEvent::BookingStatusChanged { booking } => {
                vec![RoomKey::property(booking.property.id), RoomKey::user(booking.tenant_id)]
            }
            RoomEvent::PropertyAvailabilityChanged { property_id, .. } => {
                vec![RoomKey::property(*property_id)]
            }
        }
    }

    pub fn booking_status(&self) -> Option<BookingStatus> {
        match self {
            RoomEvent::BookingCreated { booking } | RoomEvent::BookingStatusChanged { booking } => Some(booking.status),
            RoomEvent::PropertyAvailabilityChanged { .. } => None
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomAction {
    Join,
    Leave
}

/// Client to server frame: `{action: "join"|"leave", room}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClientCommand {
    pub action: RoomAction,
    pub room: RoomKey
}

impl ClientCommand {

    pub fn join(room: RoomKey) -> Self {
        ClientCommand { action: RoomAction::Join, room }
    }

    pub fn leave(room: RoomKey) -> Self {
        ClientCommand { action: RoomAction::Leave, room }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;

    #[test]
    fn availability_frame_uses_flat_wire_shape() {
        let property_id = Uuid::new_v4();
        let notification = Notification::new(RoomEvent::PropertyAvailabilityChanged { property_id, available: false });
        let value = serde_json::to_value(&notification).unwrap();

        assert_eq!(value["type"], "property.availabilityChanged");
        assert_eq!(value["propertyId"], json!(property_id));
        assert_eq!(value["available"], json!(false));
        assert_eq!(value["rooms"], json!([format!("property:{property_id}")]));

        let parsed: Notification = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, notification);
    }

    #[test]
    fn unknown_type_is_not_a_notification() {
        let frame = json!({"type": "booking.deleted", "rooms": [], "createdAt": Utc::now()});
        assert!(serde_json::from_value::<Notification>(frame).is_err());
    }

    #[test]
    fn client_command_wire_shape() {
        let id = Uuid::new_v4();
        let text = serde_json::to_string(&ClientCommand::join(RoomKey::user(id))).unwrap();
        assert_eq!(text, format!(r#"{{"action":"join","room":"user:{id}"}}"#));

        let leave: ClientCommand = serde_json::from_str(&format!(r#"{{"action":"leave","room":"property:{id}"}}"#)).unwrap();
        assert_eq!(leave, ClientCommand::leave(RoomKey::property(id)));
    }
}
