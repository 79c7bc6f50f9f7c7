use std::sync::Arc;

use fieldops_client::{Config, HttpBackend};
use fieldops_core::models::{Coordinate, DroneStatus, MissionStatus, MissionType};
use fieldops_core::stores::{
    DroneStore, FieldStore, MissionStore, MissionUpdate, NewMission, PlannerService,
};
use fieldops_core::{EditError, InMemoryBackend, Scene, StoreError};

/// Serve a fresh mock backend on an ephemeral port.
async fn spawn_mock() -> (HttpBackend, Arc<InMemoryBackend>) {
    spawn_mock_as("tgromov").await
}

async fn spawn_mock_as(user: &str) -> (HttpBackend, Arc<InMemoryBackend>) {
    let state = Arc::new(InMemoryBackend::new("mock"));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = fieldops_mock::app(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let config = Config::single_host(&format!("http://{addr}"), user);
    (HttpBackend::new(config).expect("client"), state)
}

fn boundary() -> Vec<Coordinate> {
    vec![
        Coordinate::new(55.7500, 37.6100),
        Coordinate::new(55.7520, 37.6100),
        Coordinate::new(55.7520, 37.6130),
        Coordinate::new(55.7500, 37.6130),
    ]
}

#[tokio::test]
async fn field_store_round_trip() {
    let (backend, _state) = spawn_mock().await;

    let field = backend.create_field("North", "wheat", &boundary()).await.unwrap();
    assert_eq!(field.created_by, "tgromov");
    assert_eq!(field.coordinates, boundary());

    let mut moved = boundary();
    moved[1] = Coordinate::new(55.7525, 37.6095);
    let updated = backend
        .update_field(&field.id, "North", "barley", &moved)
        .await
        .unwrap();
    assert_eq!(updated.culture, "barley");
    assert_eq!(backend.get_field(&field.id).await.unwrap(), updated);
    assert_eq!(backend.list_fields("tgromov").await.unwrap(), vec![updated]);

    backend.delete_field(&field.id).await.unwrap();
    let err = backend.get_field(&field.id).await.unwrap_err();
    assert_eq!(err, StoreError::not_found("field", field.id.as_str()));
}

#[tokio::test]
async fn invalid_boundary_is_rejected_by_service() {
    let (backend, _state) = spawn_mock().await;
    let err = backend
        .create_field("Line", "wheat", &boundary()[..2])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected { status: 400, .. }));
}

#[tokio::test]
async fn drone_store_round_trip() {
    let (backend, _state) = spawn_mock().await;

    let drone = backend.create_drone("Quad-1").await.unwrap();
    assert_eq!(drone.status, DroneStatus::Available);

    let updated = backend
        .update_drone(&drone.id, "Quad-1", DroneStatus::Charging)
        .await
        .unwrap();
    assert_eq!(updated.status, DroneStatus::Charging);
    assert_eq!(backend.list_drones("tgromov").await.unwrap(), vec![updated]);

    backend.delete_drone(&drone.id).await.unwrap();
    assert!(backend.get_drone(&drone.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn mission_and_planner_round_trip() {
    let (backend, _state) = spawn_mock().await;
    let field = backend.create_field("North", "wheat", &boundary()).await.unwrap();

    let route = backend
        .compute_route(&field.coordinates, MissionType::Research)
        .await
        .unwrap();
    assert!(route.len() >= 2);

    let mission = backend
        .create_mission(NewMission {
            name: "Survey".into(),
            mission_type: MissionType::Research,
            status: MissionStatus::Created,
            field_id: field.id.clone(),
            drone_id: None,
            started_at: None,
            route: route.clone(),
        })
        .await
        .unwrap();
    assert_eq!(mission.created_by, "tgromov");
    assert_eq!(backend.route_for_mission(&mission.id).await.unwrap(), route);

    let mut update = MissionUpdate::from_mission(&mission, route[..2].to_vec());
    update.status = MissionStatus::Scheduled;
    let updated = backend.update_mission(&mission.id, update).await.unwrap();
    assert_eq!(updated.status, MissionStatus::Scheduled);
    assert_eq!(updated.updated_by.as_deref(), Some("tgromov"));
    assert_eq!(
        backend.route_for_mission(&mission.id).await.unwrap(),
        route[..2].to_vec()
    );
    assert_eq!(backend.list_missions("tgromov").await.unwrap(), vec![updated]);

    backend.delete_mission(&mission.id).await.unwrap();
    assert!(backend
        .route_for_mission(&mission.id)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn mission_scene_over_http_honours_status_gate() {
    let (backend, _state) = spawn_mock().await;
    let field = backend.create_field("North", "wheat", &boundary()).await.unwrap();
    let route = backend
        .compute_route(&field.coordinates, MissionType::Patrol)
        .await
        .unwrap();
    let mission = backend
        .create_mission(NewMission {
            name: "Perimeter".into(),
            mission_type: MissionType::Patrol,
            status: MissionStatus::Scheduled,
            field_id: field.id.clone(),
            drone_id: None,
            started_at: None,
            route,
        })
        .await
        .unwrap();

    let mut scene = Scene::open_mission(&backend, &mission.id)
        .await
        .ready()
        .expect("mission scene");
    scene.begin_route_edit().unwrap();
    scene
        .move_route_vertex(0, Coordinate::new(55.7499, 37.6099))
        .unwrap();
    scene.commit_route(&backend).await.unwrap();
    assert_eq!(
        backend.route_for_mission(&mission.id).await.unwrap()[0],
        Coordinate::new(55.7499, 37.6099)
    );

    let current = backend.get_mission(&mission.id).await.unwrap();
    let mut update = MissionUpdate::from_mission(
        &current,
        backend.route_for_mission(&mission.id).await.unwrap(),
    );
    update.status = MissionStatus::Running;
    backend.update_mission(&mission.id, update).await.unwrap();

    scene.reload(&backend).await.unwrap();
    assert!(matches!(
        scene.begin_route_edit(),
        Err(EditError::ReadOnly { .. })
    ));
    assert!(!scene.frame().route.unwrap().interactive);
}

#[tokio::test]
async fn reserved_characters_stay_inside_one_path_segment() {
    let (backend, _state) = spawn_mock_as("field/ops?team").await;
    let field = backend.create_field("North", "wheat", &boundary()).await.unwrap();
    assert_eq!(field.created_by, "field/ops?team");

    assert_eq!(
        backend.list_fields("field/ops?team").await.unwrap(),
        vec![field]
    );
    assert!(backend.list_fields("field").await.unwrap().is_empty());
}
