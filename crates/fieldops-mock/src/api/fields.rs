//! Field service endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use fieldops_core::geometry::{self, GeometryKind};
use fieldops_core::models::{CreateFieldRequest, FieldEnvelope, FieldList, UpdateFieldRequest};
use fieldops_core::StoreError;

use crate::api::ApiError;
use crate::AppState;

/// Fields created by `login`.
pub async fn list_fields(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> Result<Json<FieldList>, ApiError> {
    Ok(Json(FieldList {
        fields: state.fields_by(&login)?,
    }))
}

pub async fn get_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FieldEnvelope>, ApiError> {
    Ok(Json(FieldEnvelope {
        field: state.field(&id)?,
    }))
}

pub async fn create_field(
    State(state): State<AppState>,
    Json(req): Json<CreateFieldRequest>,
) -> Result<(StatusCode, Json<FieldEnvelope>), ApiError> {
    check_boundary(&req.coordinates)?;
    let field = state.insert_field(req)?;
    Ok((StatusCode::CREATED, Json(FieldEnvelope { field })))
}

pub async fn update_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFieldRequest>,
) -> Result<Json<FieldEnvelope>, ApiError> {
    check_boundary(&req.coordinates)?;
    let field = state.replace_field(&id, req)?;
    tracing::info!("Updated field {} ({} points)", field.id, field.coordinates.len());
    Ok(Json(FieldEnvelope { field }))
}

pub async fn delete_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.remove_field(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn check_boundary(coordinates: &[fieldops_core::Coordinate]) -> Result<(), ApiError> {
    geometry::validate(GeometryKind::Boundary, coordinates).map_err(|err| {
        ApiError(StoreError::Rejected {
            status: 400,
            message: err.to_string(),
        })
    })
}
