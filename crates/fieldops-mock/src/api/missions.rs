//! Mission service endpoints. Create and update bodies carry the route as
//! `plan`, which the planner endpoints serve back.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use fieldops_core::models::{
    CreateMissionRequest, MissionEnvelope, MissionList, UpdateMissionRequest,
};

use crate::api::ApiError;
use crate::AppState;

pub async fn list_missions(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> Result<Json<MissionList>, ApiError> {
    Ok(Json(MissionList {
        missions: state.missions_by(&login)?,
    }))
}

pub async fn get_mission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MissionEnvelope>, ApiError> {
    Ok(Json(MissionEnvelope {
        mission: state.mission(&id)?,
    }))
}

pub async fn create_mission(
    State(state): State<AppState>,
    Json(req): Json<CreateMissionRequest>,
) -> Result<(StatusCode, Json<MissionEnvelope>), ApiError> {
    let mission = state.insert_mission(req)?;
    Ok((StatusCode::CREATED, Json(MissionEnvelope { mission })))
}

pub async fn update_mission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateMissionRequest>,
) -> Result<Json<MissionEnvelope>, ApiError> {
    let mission = state.replace_mission(&id, req)?;
    tracing::info!("Updated mission {} -> {}", mission.id, mission.status.code());
    Ok(Json(MissionEnvelope { mission }))
}

pub async fn delete_mission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.remove_mission(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
