use std::sync::Arc;
use axum::Router;
use axum::routing::{get, patch};
use crate::bookings::handler::{handle_cancel_booking, handle_create_booking, handle_get_booking, handle_get_user_bookings, handle_update_booking_status};
use crate::core::AppState;

pub fn create_booking_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bookings", get(handle_get_user_bookings).post(handle_create_booking))
        .route("/api/bookings/{booking_id}", get(handle_get_booking))
        .route("/api/bookings/{booking_id}/status", patch(handle_update_booking_status))
        .route("/api/bookings/{booking_id}/cancel", patch(handle_cancel_booking))
}
