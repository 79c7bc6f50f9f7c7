//! Planner endpoints backed by the reference route generator.

use axum::{
    extract::{Path, State},
    Json,
};
use fieldops_core::models::{ComputeRouteRequest, PlanEnvelope, PlanPayload};

use crate::api::ApiError;
use crate::AppState;

pub async fn compute_route(
    State(state): State<AppState>,
    Json(req): Json<ComputeRouteRequest>,
) -> Result<Json<PlanEnvelope>, ApiError> {
    let route = state.plan(&req.mission_borders, req.mission_type)?;
    tracing::debug!("Planned {:?} route with {} points", req.mission_type, route.len());
    Ok(Json(PlanEnvelope {
        plan: PlanPayload::new(route),
    }))
}

/// Route stored with mission `id`.
pub async fn mission_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlanEnvelope>, ApiError> {
    Ok(Json(PlanEnvelope {
        plan: PlanPayload::new(state.mission_route(&id)?),
    }))
}
