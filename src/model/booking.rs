use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::model::PropertySummary;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Active,
    Completed
}

impl BookingStatus {

    pub fn to_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed"
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "approved" => Ok(BookingStatus::Approved),
            "rejected" => Ok(BookingStatus::Rejected),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "active" => Ok(BookingStatus::Active),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("Invalid booking status: {other}"))
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenantDetails {
    pub occupation: Option<String>,
    pub workplace: Option<String>,
    pub family_size: Option<u32>,
    pub alternate_mobile: Option<String>
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub struct UtilityIncluded {
    #[serde(default)]
    pub electricity: bool,
    #[serde(default)]
    pub water: bool,
    #[serde(default)]
    pub maintenance: bool
}

/// A rental application as it is kept in the store.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub move_in_date: DateTime<Utc>,
    pub lease_duration: u32,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    pub status: BookingStatus,
    pub tenant_details: Option<TenantDetails>,
    pub utility_included: UtilityIncluded,
    pub special_requests: Option<String>,
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl Booking {

    pub fn to_dto(&self, property: PropertySummary) -> BookingDTO {
        BookingDTO {
            id: self.id,
            property,
            tenant_id: self.tenant_id,
            move_in_date: self.move_in_date,
            lease_duration: self.lease_duration,
            monthly_rent: self.monthly_rent,
            security_deposit: self.security_deposit,
            status: self.status,
            tenant_details: self.tenant_details.clone(),
            utility_included: self.utility_included,
            special_requests: self.special_requests.clone(),
            contact_number: self.contact_number.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at
        }
    }
}

/// A booking with its property reference populated, used in responses and realtime events.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDTO {
    pub id: Uuid,
    pub property: PropertySummary,
    pub tenant_id: Uuid,
    pub move_in_date: DateTime<Utc>,
    pub lease_duration: u32,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    pub status: BookingStatus,
    pub tenant_details: Option<TenantDetails>,
    pub utility_included: UtilityIncluded,
    pub special_requests: Option<String>,
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub property: Uuid,
    pub move_in_date: DateTime<Utc>,
    pub lease_duration: u32,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    pub tenant_details: Option<TenantDetails>,
    #[serde(default)]
    pub utility_included: UtilityIncluded,
    pub special_requests: Option<String>,
    pub contact_number: String
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingStatusUpdate {
    pub status: String
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BookingQuery {
    pub status: Option<String>
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking: BookingDTO,
    pub message: String
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_every_known_value() {
        for status in ["pending", "approved", "rejected", "cancelled", "active", "completed"] {
            let parsed = BookingStatus::from_str(status).unwrap();
            assert_eq!(parsed.to_str(), status);
        }
        assert!(BookingStatus::from_str("archived").is_err());
    }

    #[test]
    fn new_booking_accepts_camel_case_payload() {
        let payload = serde_json::json!({
            "property": Uuid::new_v4(),
            "moveInDate": "2030-01-01T00:00:00Z",
            "leaseDuration": 12,
            "monthlyRent": 1200.0,
            "securityDeposit": 2400.0,
            "contactNumber": "+49 170 000000"
        });
        let booking: NewBooking = serde_json::from_value(payload).unwrap();
        assert_eq!(booking.lease_duration, 12);
        assert_eq!(booking.utility_included, UtilityIncluded::default());
        assert!(booking.tenant_details.is_none());
    }
}
