//! Demo records for a fresh mock backend.

use fieldops_core::models::{
    Coordinate, CreateDroneRequest, CreateFieldRequest, CreateMissionRequest, MissionStatus,
    MissionType, PlanPayload,
};
use fieldops_core::{InMemoryBackend, StoreError};

/// One field, one drone and one unscheduled research mission owned by `user`.
pub fn seed_demo(backend: &InMemoryBackend, user: &str) -> Result<(), StoreError> {
    let field = backend.insert_field(CreateFieldRequest {
        name: "Demo field".to_string(),
        culture: "wheat".to_string(),
        created_by: user.to_string(),
        coordinates: vec![
            Coordinate::new(55.7500, 37.6100),
            Coordinate::new(55.7530, 37.6100),
            Coordinate::new(55.7530, 37.6150),
            Coordinate::new(55.7500, 37.6150),
        ],
    })?;

    let drone = backend.insert_drone(CreateDroneRequest {
        name: "Demo drone".to_string(),
        created_by: user.to_string(),
    })?;

    let route = backend.plan(&field.coordinates, MissionType::Research)?;
    let mission = backend.insert_mission(CreateMissionRequest {
        name: "Demo survey".to_string(),
        mission_type: MissionType::Research,
        status: MissionStatus::initial(None),
        field_id: field.id,
        drone_id: Some(drone.id),
        started_at: None,
        created_by: user.to_string(),
        plan: PlanPayload::new(route),
    })?;

    tracing::info!(user, mission = %mission.id, "seeded demo data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_one_of_each() {
        let backend = InMemoryBackend::new("mock");
        seed_demo(&backend, "tgromov").unwrap();

        assert_eq!(backend.fields_by("tgromov").unwrap().len(), 1);
        assert_eq!(backend.drones_by("tgromov").unwrap().len(), 1);
        let missions = backend.missions_by("tgromov").unwrap();
        assert_eq!(missions.len(), 1);
        assert!(!backend.mission_route(&missions[0].id).unwrap().is_empty());
        assert!(backend.fields_by("someone-else").unwrap().is_empty());
    }
}
