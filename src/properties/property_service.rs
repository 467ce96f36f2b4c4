use std::sync::Arc;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use crate::core::AppState;
use crate::errors::AppError;
use crate::model::{NewProperty, Property, PropertyStatus};

pub struct PropertyService;

impl PropertyService {

    pub async fn register_property(state: Arc<AppState>, owner_id: Uuid, new_property: NewProperty) -> Result<Property, AppError> {
        if new_property.title.trim().is_empty() {
            return Err(AppError::ValidationError("Title is required".to_string()));
        }
        if new_property.price < 0.0 {
            return Err(AppError::ValidationError("Price cannot be negative".to_string()));
        }

        let now = Utc::now();
        let property = Property {
            id: Uuid::now_v7(),
            owner_id,
            title: new_property.title.trim().to_string(),
            description: new_property.description,
            price: new_property.price,
            location: new_property.location,
            images: new_property.images,
            status: PropertyStatus::Available,
            created_at: now,
            updated_at: now
        };
        let stored = state.store.insert_property(property).await?;
        info!("Registered property {} for owner {}", stored.id, owner_id);
        Ok(stored)
    }

    pub async fn get_property(state: Arc<AppState>, property_id: Uuid) -> Result<Property, AppError> {
        state.store.find_property(&property_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Property {property_id}")))
    }

    /// Owner-only. Listeners of the property room are told when the listing starts or stops
    /// accepting applications, moves between two unavailable statuses stay silent.
    pub async fn change_status(
        state: Arc<AppState>,
        client_id: Uuid,
        property_id: Uuid,
        status: PropertyStatus
    ) -> Result<Property, AppError> {
        let property = PropertyService::get_property(state.clone(), property_id).await?;
        if property.owner_id != client_id {
            return Err(AppError::Blocked("Only the owner can change the listing status.".to_string()));
        }

        let (previous, updated) = state.store.update_property_status(&property_id, status).await?
            .ok_or_else(|| AppError::NotFound(format!("Property {property_id}")))?;

        if previous.is_available() != updated.status.is_available() {
            state.publisher.property_availability_changed(property_id, updated.status.is_available());
        }
        Ok(updated)
    }
}
