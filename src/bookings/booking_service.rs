use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;
use crate::core::AppState;
use crate::errors::AppError;
use crate::model::{Booking, BookingDTO, BookingStatus, NewBooking, Property};

const MAX_SPECIAL_REQUEST_LEN: usize = 500;

pub struct BookingService;

impl BookingService {

    /// Stores a new `pending` application and notifies the listing and the applicant.
    pub async fn create_booking(state: Arc<AppState>, client_id: Uuid, new_booking: NewBooking) -> Result<BookingDTO, AppError> {
        BookingService::validate(&new_booking)?;

        let property = state.store.find_property(&new_booking.property).await?
            .ok_or_else(|| AppError::NotFound(format!("Property {}", new_booking.property)))?;
        if !property.status.is_available() {
            return Err(AppError::ValidationError(format!("Property is {} and does not accept applications", property.status)));
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::now_v7(),
            property_id: property.id,
            tenant_id: client_id,
            move_in_date: new_booking.move_in_date,
            lease_duration: new_booking.lease_duration,
            monthly_rent: new_booking.monthly_rent,
            security_deposit: new_booking.security_deposit,
            status: BookingStatus::Pending,
            tenant_details: new_booking.tenant_details,
            utility_included: new_booking.utility_included,
            special_requests: new_booking.special_requests.map(|text| text.trim().to_string()),
            contact_number: new_booking.contact_number.trim().to_string(),
            created_at: now,
            updated_at: now
        };

        let stored = state.store.insert_booking(booking).await?;
        let dto = stored.to_dto(property.to_summary());
        info!("Booking {} created for property {}", dto.id, property.id);

        state.publisher.booking_created(dto.clone());
        Ok(dto)
    }

    pub async fn get_booking(state: Arc<AppState>, client_id: Uuid, booking_id: Uuid) -> Result<BookingDTO, AppError> {
        let (booking, property) = BookingService::load(&state, booking_id).await?;
        if booking.tenant_id != client_id && property.owner_id != client_id {
            return Err(AppError::Blocked("Not authorized to view this rental application".to_string()));
        }
        Ok(booking.to_dto(property.to_summary()))
    }

    pub async fn get_user_bookings(state: Arc<AppState>, client_id: Uuid, status: Option<BookingStatus>) -> Result<Vec<BookingDTO>, AppError> {
        let bookings = state.store.find_bookings_by_tenant(&client_id, status).await?;
        let mut dtos = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let property = state.store.find_property(&booking.property_id).await?
                .ok_or_else(|| AppError::NotFound(format!("Property {}", booking.property_id)))?;
            dtos.push(booking.to_dto(property.to_summary()));
        }
        Ok(dtos)
    }

    /// The applicant or the listing owner may move an application. Cancelling is only possible
    /// while it is still pending.
    pub async fn update_status(state: Arc<AppState>, client_id: Uuid, booking_id: Uuid, status: BookingStatus) -> Result<BookingDTO, AppError> {
        let (booking, property) = BookingService::load(&state, booking_id).await?;
        if booking.tenant_id != client_id && property.owner_id != client_id {
            return Err(AppError::Blocked("Not authorized to update this booking".to_string()));
        }
        BookingService::apply_status(state, booking, property, status).await
    }

    pub async fn cancel_booking(state: Arc<AppState>, client_id: Uuid, booking_id: Uuid) -> Result<BookingDTO, AppError> {
        let (booking, property) = BookingService::load(&state, booking_id).await?;
        if booking.tenant_id != client_id {
            return Err(AppError::Blocked("Not authorized to cancel this booking".to_string()));
        }
        BookingService::apply_status(state, booking, property, BookingStatus::Cancelled).await
    }

    async fn apply_status(state: Arc<AppState>, booking: Booking, property: Property, status: BookingStatus) -> Result<BookingDTO, AppError> {
        if status == BookingStatus::Cancelled && booking.status != BookingStatus::Pending {
            return Err(AppError::Conflict("Only pending bookings can be cancelled".to_string()));
        }
        if booking.status == status {
            debug!("Booking {} already {}, nothing to publish", booking.id, status);
            return Ok(booking.to_dto(property.to_summary()));
        }

        let updated = state.store.update_booking_status(&booking.id, status).await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {}", booking.id)))?;
        let dto = updated.to_dto(property.to_summary());
        info!("Booking {} moved from {} to {}", dto.id, booking.status, dto.status);

        state.publisher.booking_status_changed(dto.clone());
        Ok(dto)
    }

    async fn load(state: &Arc<AppState>, booking_id: Uuid) -> Result<(Booking, Property), AppError> {
        let booking = state.store.find_booking(&booking_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {booking_id}")))?;
        let property = state.store.find_property(&booking.property_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Property {}", booking.property_id)))?;
        Ok((booking, property))
    }

    fn validate(new_booking: &NewBooking) -> Result<(), AppError> {
        if new_booking.lease_duration < 1 {
            return Err(AppError::ValidationError("Minimum lease duration is 1 month".to_string()));
        }
        if new_booking.monthly_rent < 0.0 {
            return Err(AppError::ValidationError("Rent cannot be negative".to_string()));
        }
        if new_booking.security_deposit < 0.0 {
            return Err(AppError::ValidationError("Security deposit cannot be negative".to_string()));
        }
        if new_booking.contact_number.trim().is_empty() {
            return Err(AppError::ValidationError("Contact number is required".to_string()));
        }
        if new_booking.special_requests.as_ref().is_some_and(|text| text.trim().chars().count() > MAX_SPECIAL_REQUEST_LEN) {
            return Err(AppError::ValidationError("Special requests cannot exceed 500 characters".to_string()));
        }
        if new_booking.move_in_date < Utc::now() {
            return Err(AppError::ValidationError("Move-in date cannot be in the past".to_string()));
        }
        Ok(())
    }
}
