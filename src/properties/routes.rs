use std::sync::Arc;
use axum::Router;
use axum::routing::{get, patch, post};
use crate::core::AppState;
use crate::properties::handler::{handle_change_property_status, handle_get_property, handle_register_property};

pub fn create_property_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/properties", post(handle_register_property))
        .route("/api/properties/{property_id}", get(handle_get_property))
        .route("/api/properties/{property_id}/status", patch(handle_change_property_status))
}
