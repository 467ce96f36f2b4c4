use std::sync::Arc;
use axum::Router;
use axum::routing::get;
use crate::core::AppState;
use crate::realtime::socket::upgrade_socket;

pub fn create_realtime_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ws", get(upgrade_socket))
}
