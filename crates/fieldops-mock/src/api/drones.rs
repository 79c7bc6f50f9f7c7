//! Drone service endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use fieldops_core::models::{CreateDroneRequest, DroneEnvelope, DroneList, UpdateDroneRequest};

use crate::api::ApiError;
use crate::AppState;

pub async fn list_drones(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> Result<Json<DroneList>, ApiError> {
    Ok(Json(DroneList {
        drones: state.drones_by(&login)?,
    }))
}

pub async fn get_drone(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DroneEnvelope>, ApiError> {
    Ok(Json(DroneEnvelope {
        drone: state.drone(&id)?,
    }))
}

pub async fn create_drone(
    State(state): State<AppState>,
    Json(req): Json<CreateDroneRequest>,
) -> Result<(StatusCode, Json<DroneEnvelope>), ApiError> {
    let drone = state.insert_drone(req)?;
    Ok((StatusCode::CREATED, Json(DroneEnvelope { drone })))
}

pub async fn update_drone(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDroneRequest>,
) -> Result<Json<DroneEnvelope>, ApiError> {
    Ok(Json(DroneEnvelope {
        drone: state.replace_drone(&id, req)?,
    }))
}

pub async fn delete_drone(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.remove_drone(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
