use std::str::FromStr;
use std::sync::Arc;
use axum::Json;
use axum::extract::{Path, Query, State};
use http::StatusCode;
use uuid::Uuid;
use crate::bookings::booking_service::BookingService;
use crate::core::AppState;
use crate::errors::AppError;
use crate::model::{BookingDTO, BookingQuery, BookingResponse, BookingStatus, BookingStatusUpdate, CurrentUser, NewBooking};

pub async fn handle_create_booking(
    State(state): State<Arc<AppState>>,
    CurrentUser(client_id): CurrentUser,
    Json(payload): Json<NewBooking>
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {

    let booking = BookingService::create_booking(state, client_id, payload).await?;
    Ok((StatusCode::CREATED, Json(BookingResponse { booking, message: "Booking created successfully".to_string() })))
}

pub async fn handle_get_user_bookings(
    State(state): State<Arc<AppState>>,
    CurrentUser(client_id): CurrentUser,
    Query(params): Query<BookingQuery>
) -> Result<Json<Vec<BookingDTO>>, AppError> {

    let status = params.status
        .map(|status| BookingStatus::from_str(&status))
        .transpose()
        .map_err(AppError::ValidationError)?;
    let bookings = BookingService::get_user_bookings(state, client_id, status).await?;
    Ok(Json(bookings))
}

pub async fn handle_get_booking(
    State(state): State<Arc<AppState>>,
    CurrentUser(client_id): CurrentUser,
    Path(booking_id): Path<Uuid>
) -> Result<Json<BookingDTO>, AppError> {

    let booking = BookingService::get_booking(state, client_id, booking_id).await?;
    Ok(Json(booking))
}

pub async fn handle_update_booking_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(client_id): CurrentUser,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<BookingStatusUpdate>
) -> Result<Json<BookingResponse>, AppError> {

    let status = BookingStatus::from_str(&payload.status).map_err(AppError::ValidationError)?;
    let booking = BookingService::update_status(state, client_id, booking_id, status).await?;
    let message = if status == BookingStatus::Cancelled {
        "Booking cancelled successfully"
    } else {
        "Booking status updated successfully"
    };
    Ok(Json(BookingResponse { booking, message: message.to_string() }))
}

pub async fn handle_cancel_booking(
    State(state): State<Arc<AppState>>,
    CurrentUser(client_id): CurrentUser,
    Path(booking_id): Path<Uuid>
) -> Result<Json<BookingResponse>, AppError> {

    let booking = BookingService::cancel_booking(state, client_id, booking_id).await?;
    Ok(Json(BookingResponse { booking, message: "Booking cancelled successfully".to_string() }))
}
