//! In-memory backend implementing every collaborator.
//!
//! Backs the mock HTTP server and the scene tests. Tables are `DashMap`s so a
//! single instance can be shared by concurrent request handlers.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    Coordinate, CreateDroneRequest, CreateFieldRequest, CreateMissionRequest, Drone, DroneStatus,
    Field, Mission, MissionType, UpdateDroneRequest, UpdateFieldRequest, UpdateMissionRequest,
};
use crate::planner::{self, DEFAULT_SWATH_M};
use crate::stores::{
    DroneStore, FieldStore, MissionStore, MissionUpdate, NewMission, PlannerService,
};

pub struct InMemoryBackend {
    owner: String,
    fields: DashMap<String, Field>,
    drones: DashMap<String, Drone>,
    missions: DashMap<String, Mission>,
    /// Route of each mission, keyed by mission id
    plans: DashMap<String, Vec<Coordinate>>,
    offline: AtomicBool,
}

impl InMemoryBackend {
    /// Backend acting on behalf of `owner` when used through the store traits.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            fields: DashMap::new(),
            drones: DashMap::new(),
            missions: DashMap::new(),
            plans: DashMap::new(),
            offline: AtomicBool::new(false),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Make every subsequent call fail with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Transport("backend offline".to_string()))
        } else {
            Ok(())
        }
    }

    // ========== FIELDS ==========

    pub fn fields_by(&self, owner: &str) -> Result<Vec<Field>, StoreError> {
        self.check_online()?;
        let mut fields: Vec<Field> = self
            .fields
            .iter()
            .filter(|f| f.created_by == owner)
            .map(|f| f.value().clone())
            .collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fields)
    }

    pub fn field(&self, id: &str) -> Result<Field, StoreError> {
        self.check_online()?;
        self.fields
            .get(id)
            .map(|f| f.value().clone())
            .ok_or_else(|| StoreError::not_found("field", id))
    }

    pub fn insert_field(&self, req: CreateFieldRequest) -> Result<Field, StoreError> {
        self.check_online()?;
        let field = Field {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            culture: req.culture,
            coordinates: req.coordinates,
            created_by: req.created_by,
        };
        self.fields.insert(field.id.clone(), field.clone());
        tracing::info!("Created field '{}' ({})", field.name, field.id);
        Ok(field)
    }

    pub fn replace_field(&self, id: &str, req: UpdateFieldRequest) -> Result<Field, StoreError> {
        self.check_online()?;
        let mut entry = self
            .fields
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("field", id))?;
        entry.name = req.name;
        entry.culture = req.culture;
        entry.coordinates = req.coordinates;
        Ok(entry.clone())
    }

    pub fn remove_field(&self, id: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.fields
            .remove(id)
            .map(|_| tracing::info!("Deleted field {}", id))
            .ok_or_else(|| StoreError::not_found("field", id))
    }

    // ========== DRONES ==========

    pub fn drones_by(&self, owner: &str) -> Result<Vec<Drone>, StoreError> {
        self.check_online()?;
        let mut drones: Vec<Drone> = self
            .drones
            .iter()
            .filter(|d| d.created_by == owner)
            .map(|d| d.value().clone())
            .collect();
        drones.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(drones)
    }

    pub fn drone(&self, id: &str) -> Result<Drone, StoreError> {
        self.check_online()?;
        self.drones
            .get(id)
            .map(|d| d.value().clone())
            .ok_or_else(|| StoreError::not_found("drone", id))
    }

    pub fn insert_drone(&self, req: CreateDroneRequest) -> Result<Drone, StoreError> {
        self.check_online()?;
        let drone = Drone {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            status: DroneStatus::default(),
            created_by: req.created_by,
        };
        self.drones.insert(drone.id.clone(), drone.clone());
        tracing::info!("Created drone '{}' ({})", drone.name, drone.id);
        Ok(drone)
    }

    pub fn replace_drone(&self, id: &str, req: UpdateDroneRequest) -> Result<Drone, StoreError> {
        self.check_online()?;
        let mut entry = self
            .drones
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("drone", id))?;
        entry.name = req.name;
        entry.status = req.status;
        Ok(entry.clone())
    }

    pub fn remove_drone(&self, id: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.drones
            .remove(id)
            .map(|_| tracing::info!("Deleted drone {}", id))
            .ok_or_else(|| StoreError::not_found("drone", id))
    }

    // ========== MISSIONS ==========

    pub fn missions_by(&self, owner: &str) -> Result<Vec<Mission>, StoreError> {
        self.check_online()?;
        let mut missions: Vec<Mission> = self
            .missions
            .iter()
            .filter(|m| m.created_by == owner)
            .map(|m| m.value().clone())
            .collect();
        missions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(missions)
    }

    pub fn mission(&self, id: &str) -> Result<Mission, StoreError> {
        self.check_online()?;
        self.missions
            .get(id)
            .map(|m| m.value().clone())
            .ok_or_else(|| StoreError::not_found("mission", id))
    }

    pub fn insert_mission(&self, req: CreateMissionRequest) -> Result<Mission, StoreError> {
        self.check_online()?;
        if !self.fields.contains_key(&req.field_id) {
            return Err(StoreError::not_found("field", req.field_id));
        }

        let now = Utc::now();
        let mission = Mission {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            mission_type: req.mission_type,
            status: req.status,
            field_id: req.field_id,
            drone_id: req.drone_id,
            created_by: req.created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
            started_at: req.started_at,
        };
        self.plans.insert(mission.id.clone(), req.plan.coordinates);
        self.missions.insert(mission.id.clone(), mission.clone());
        tracing::info!("Created mission '{}' ({})", mission.name, mission.id);
        Ok(mission)
    }

    pub fn replace_mission(
        &self,
        id: &str,
        req: UpdateMissionRequest,
    ) -> Result<Mission, StoreError> {
        self.check_online()?;
        let mut entry = self
            .missions
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("mission", id))?;
        entry.name = req.name;
        entry.status = req.status;
        entry.started_at = req.started_at;
        entry.updated_by = req.updated_by;
        entry.updated_at = Utc::now();
        self.plans.insert(id.to_string(), req.plan.coordinates);
        Ok(entry.clone())
    }

    pub fn remove_mission(&self, id: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.plans.remove(id);
        self.missions
            .remove(id)
            .map(|_| tracing::info!("Deleted mission {}", id))
            .ok_or_else(|| StoreError::not_found("mission", id))
    }

    // ========== PLANNER ==========

    pub fn plan(
        &self,
        boundary: &[Coordinate],
        mission_type: MissionType,
    ) -> Result<Vec<Coordinate>, StoreError> {
        self.check_online()?;
        planner::plan_route(boundary, mission_type, DEFAULT_SWATH_M).map_err(|err| {
            StoreError::Rejected {
                status: 400,
                message: err.to_string(),
            }
        })
    }

    pub fn mission_route(&self, mission_id: &str) -> Result<Vec<Coordinate>, StoreError> {
        self.check_online()?;
        self.plans
            .get(mission_id)
            .map(|p| p.value().clone())
            .ok_or_else(|| StoreError::not_found("plan", mission_id))
    }
}

impl FieldStore for InMemoryBackend {
    async fn list_fields(&self, owner: &str) -> Result<Vec<Field>, StoreError> {
        self.fields_by(owner)
    }

    async fn get_field(&self, id: &str) -> Result<Field, StoreError> {
        self.field(id)
    }

    async fn create_field(
        &self,
        name: &str,
        culture: &str,
        coordinates: &[Coordinate],
    ) -> Result<Field, StoreError> {
        self.insert_field(CreateFieldRequest {
            name: name.to_string(),
            culture: culture.to_string(),
            created_by: self.owner.clone(),
            coordinates: coordinates.to_vec(),
        })
    }

    async fn update_field(
        &self,
        id: &str,
        name: &str,
        culture: &str,
        coordinates: &[Coordinate],
    ) -> Result<Field, StoreError> {
        self.replace_field(
            id,
            UpdateFieldRequest {
                name: name.to_string(),
                culture: culture.to_string(),
                coordinates: coordinates.to_vec(),
            },
        )
    }

    async fn delete_field(&self, id: &str) -> Result<(), StoreError> {
        self.remove_field(id)
    }
}

impl DroneStore for InMemoryBackend {
    async fn list_drones(&self, owner: &str) -> Result<Vec<Drone>, StoreError> {
        self.drones_by(owner)
    }

    async fn get_drone(&self, id: &str) -> Result<Drone, StoreError> {
        self.drone(id)
    }

    async fn create_drone(&self, name: &str) -> Result<Drone, StoreError> {
        self.insert_drone(CreateDroneRequest {
            name: name.to_string(),
            created_by: self.owner.clone(),
        })
    }

    async fn update_drone(
        &self,
        id: &str,
        name: &str,
        status: DroneStatus,
    ) -> Result<Drone, StoreError> {
        self.replace_drone(
            id,
            UpdateDroneRequest {
                name: name.to_string(),
                status,
            },
        )
    }

    async fn delete_drone(&self, id: &str) -> Result<(), StoreError> {
        self.remove_drone(id)
    }
}

impl MissionStore for InMemoryBackend {
    async fn list_missions(&self, owner: &str) -> Result<Vec<Mission>, StoreError> {
        self.missions_by(owner)
    }

    async fn get_mission(&self, id: &str) -> Result<Mission, StoreError> {
        self.mission(id)
    }

    async fn create_mission(&self, request: NewMission) -> Result<Mission, StoreError> {
        self.insert_mission(request.into_request(self.owner.clone()))
    }

    async fn update_mission(
        &self,
        id: &str,
        update: MissionUpdate,
    ) -> Result<Mission, StoreError> {
        self.replace_mission(id, update.into_request(self.owner.clone()))
    }

    async fn delete_mission(&self, id: &str) -> Result<(), StoreError> {
        self.remove_mission(id)
    }
}

impl PlannerService for InMemoryBackend {
    async fn compute_route(
        &self,
        boundary: &[Coordinate],
        mission_type: MissionType,
    ) -> Result<Vec<Coordinate>, StoreError> {
        self.plan(boundary, mission_type)
    }

    async fn route_for_mission(&self, mission_id: &str) -> Result<Vec<Coordinate>, StoreError> {
        self.mission_route(mission_id)
    }
}
