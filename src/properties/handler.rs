use std::str::FromStr;
use std::sync::Arc;
use axum::Json;
use axum::extract::{Path, State};
use http::StatusCode;
use uuid::Uuid;
use crate::core::AppState;
use crate::errors::AppError;
use crate::model::{CurrentUser, NewProperty, Property, PropertyStatus, PropertyStatusUpdate};
use crate::properties::property_service::PropertyService;

pub async fn handle_register_property(
    State(state): State<Arc<AppState>>,
    CurrentUser(client_id): CurrentUser,
    Json(payload): Json<NewProperty>
) -> Result<(StatusCode, Json<Property>), AppError> {

    let property = PropertyService::register_property(state, client_id, payload).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

pub async fn handle_get_property(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<Uuid>
) -> Result<Json<Property>, AppError> {

    let property = PropertyService::get_property(state, property_id).await?;
    Ok(Json(property))
}

pub async fn handle_change_property_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(client_id): CurrentUser,
    Path(property_id): Path<Uuid>,
    Json(payload): Json<PropertyStatusUpdate>
) -> Result<Json<Property>, AppError> {

    let status = PropertyStatus::from_str(&payload.status).map_err(AppError::ValidationError)?;
    let property = PropertyService::change_status(state, client_id, property_id, status).await?;
    Ok(Json(property))
}
