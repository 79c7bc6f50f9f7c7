//! Remote collaborators consumed by the editing core.
//!
//! Transport is not modelled here: each call is an async request/response
//! that either yields a typed record or fails with a [`StoreError`].

#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{
    Coordinate, CreateMissionRequest, Drone, DroneStatus, Field, Mission, MissionStatus,
    MissionType, PlanPayload, UpdateMissionRequest,
};

pub trait FieldStore {
    async fn list_fields(&self, owner: &str) -> Result<Vec<Field>, StoreError>;
    async fn get_field(&self, id: &str) -> Result<Field, StoreError>;
    async fn create_field(
        &self,
        name: &str,
        culture: &str,
        coordinates: &[Coordinate],
    ) -> Result<Field, StoreError>;
    async fn update_field(
        &self,
        id: &str,
        name: &str,
        culture: &str,
        coordinates: &[Coordinate],
    ) -> Result<Field, StoreError>;
    async fn delete_field(&self, id: &str) -> Result<(), StoreError>;
}

pub trait DroneStore {
    async fn list_drones(&self, owner: &str) -> Result<Vec<Drone>, StoreError>;
    async fn get_drone(&self, id: &str) -> Result<Drone, StoreError>;
    async fn create_drone(&self, name: &str) -> Result<Drone, StoreError>;
    async fn update_drone(
        &self,
        id: &str,
        name: &str,
        status: DroneStatus,
    ) -> Result<Drone, StoreError>;
    async fn delete_drone(&self, id: &str) -> Result<(), StoreError>;
}

pub trait MissionStore {
    async fn list_missions(&self, owner: &str) -> Result<Vec<Mission>, StoreError>;
    async fn get_mission(&self, id: &str) -> Result<Mission, StoreError>;
    async fn create_mission(&self, request: NewMission) -> Result<Mission, StoreError>;
    async fn update_mission(
        &self,
        id: &str,
        update: MissionUpdate,
    ) -> Result<Mission, StoreError>;
    async fn delete_mission(&self, id: &str) -> Result<(), StoreError>;
}

/// Route planning service, a black box from the caller's side.
pub trait PlannerService {
    async fn compute_route(
        &self,
        boundary: &[Coordinate],
        mission_type: MissionType,
    ) -> Result<Vec<Coordinate>, StoreError>;
    async fn route_for_mission(&self, mission_id: &str) -> Result<Vec<Coordinate>, StoreError>;
}

/// Fields of a mission to create. The author is filled in by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMission {
    pub name: String,
    pub mission_type: MissionType,
    pub status: MissionStatus,
    pub field_id: String,
    pub drone_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub route: Vec<Coordinate>,
}

impl NewMission {
    pub fn into_request(self, created_by: impl Into<String>) -> CreateMissionRequest {
        CreateMissionRequest {
            name: self.name,
            mission_type: self.mission_type,
            status: self.status,
            field_id: self.field_id,
            drone_id: self.drone_id,
            started_at: self.started_at,
            created_by: created_by.into(),
            plan: PlanPayload::new(self.route),
        }
    }
}

/// Full replacement of a mission's mutable fields, route included.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionUpdate {
    pub name: String,
    pub status: MissionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub route: Vec<Coordinate>,
}

impl MissionUpdate {
    /// Keep everything from `mission` and send `route` as its plan.
    pub fn from_mission(mission: &Mission, route: Vec<Coordinate>) -> Self {
        Self {
            name: mission.name.clone(),
            status: mission.status,
            started_at: mission.started_at,
            route,
        }
    }

    pub fn into_request(self, updated_by: impl Into<String>) -> UpdateMissionRequest {
        UpdateMissionRequest {
            name: self.name,
            status: self.status,
            started_at: self.started_at,
            updated_by: Some(updated_by.into()),
            plan: PlanPayload::new(self.route),
        }
    }
}
