use std::sync::Arc;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::routing::get;
use http::header::{CONNECTION, CONTENT_LENGTH, ORIGIN};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use crate::bookings::routes::create_booking_routes;
use crate::core::AppState;
use crate::model::USER_ID_HEADER;
use crate::properties::routes::create_property_routes;
use crate::realtime::routes::create_realtime_routes;

/**
 * Initializing the api routes.
 */
pub fn init_router(app_state: AppState) -> Router {
    let cors = init_cors(&app_state.env.cors_origin);

    let public_routing = Router::new()
        .route("/", get(|| async { "Hello, world! I'm the rentals realtime service." }))
        .route("/health", get(|| async { (StatusCode::OK, "Healthy").into_response() }));

    let api_routing = Router::new() //add new routes here
        .merge(create_realtime_routes())
        .merge(create_property_routes())
        .merge(create_booking_routes())

        .layer(
            ServiceBuilder::new() //layering top to bottom middleware
                .layer(TraceLayer::new_for_http()) //1
                .layer(cors) //2
        )
        .with_state(Arc::new(app_state));
    public_routing.merge(api_routing)
}

fn init_cors(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE, CONTENT_LENGTH, CONNECTION, ORIGIN, HeaderName::from_static(USER_ID_HEADER)])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS]);
    match origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            warn!("Invalid cors origin '{origin}', cross-origin requests are rejected.");
            cors
        }
    }
}
