use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Available,
    Rented,
    Maintenance
}

impl PropertyStatus {

    pub fn to_str(&self) -> &str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Rented => "rented",
            PropertyStatus::Maintenance => "maintenance"
        }
    }

    /// Only `available` listings accept new applications.
    pub fn is_available(&self) -> bool {
        matches!(self, PropertyStatus::Available)
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(PropertyStatus::Available),
            "rented" => Ok(PropertyStatus::Rented),
            "maintenance" => Ok(PropertyStatus::Maintenance),
            other => Err(format!("Invalid property status: {other}"))
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: Option<String>
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: Location,
    pub images: Vec<String>,
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl Property {

    pub fn to_summary(&self) -> PropertySummary {
        PropertySummary {
            id: self.id,
            title: self.title.clone(),
            location: self.location.clone(),
            price: self.price,
            images: self.images.clone()
        }
    }
}

/// The slice of a listing that travels with a booking: title, location, price and images.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: Uuid,
    pub title: String,
    pub location: Location,
    pub price: f64,
    pub images: Vec<String>
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: Location,
    #[serde(default)]
    pub images: Vec<String>
}

#[derive(Debug, Deserialize, Clone)]
pub struct PropertyStatusUpdate {
    pub status: String
}
