use chrono::{Duration, Utc};
use uuid::Uuid;
use crate::model::{BookingDTO, BookingStatus, Location, Property, PropertyStatus, PropertySummary};

pub fn location() -> Location {
    Location {
        address: "Main St 1".to_string(),
        city: "Berlin".to_string(),
        state: "BE".to_string(),
        country: "DE".to_string(),
        zip_code: None,
    }
}

pub fn property(owner_id: Uuid) -> Property {
    Property {
        id: Uuid::new_v4(),
        owner_id,
        title: "Loft near the park".to_string(),
        description: "Two rooms, balcony".to_string(),
        price: 1000.0,
        location: location(),
        images: vec!["https://img.example/loft.jpg".to_string()],
        status: PropertyStatus::Available,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn booking_dto(property_id: Uuid, tenant_id: Uuid, status: BookingStatus) -> BookingDTO {
    BookingDTO {
        id: Uuid::new_v4(),
        property: PropertySummary {
            id: property_id,
            title: "Loft near the park".to_string(),
            location: location(),
            price: 1000.0,
            images: vec![],
        },
        tenant_id,
        move_in_date: Utc::now() + Duration::days(30),
        lease_duration: 12,
        monthly_rent: 1000.0,
        security_deposit: 2000.0,
        status,
        tenant_details: None,
        utility_included: Default::default(),
        special_requests: None,
        contact_number: "0123".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
