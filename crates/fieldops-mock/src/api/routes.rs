//! Route table. Each service keeps the path layout of its real counterpart.

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{drones, fields, missions, planner};
use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Fields
        .route("/v1/fields", post(fields::create_field))
        .route("/v1/fields/authors/:login", get(fields::list_fields))
        .route(
            "/v1/fields/:id",
            get(fields::get_field)
                .put(fields::update_field)
                .delete(fields::delete_field),
        )
        // Drones
        .route("/v1/drones", post(drones::create_drone))
        .route("/v1/drones/authors/:login", get(drones::list_drones))
        .route(
            "/v1/drones/:id",
            get(drones::get_drone)
                .put(drones::update_drone)
                .delete(drones::delete_drone),
        )
        // Missions
        .route("/v1/missions", post(missions::create_mission))
        .route("/v1/missions/authors/:login", get(missions::list_missions))
        .route(
            "/v1/missions/:id",
            get(missions::get_mission)
                .put(missions::update_mission)
                .delete(missions::delete_mission),
        )
        // Planner
        .route("/v1/planner/mission", post(planner::compute_route))
        .route("/v1/planner/missions/:id", get(planner::mission_plan))
}
