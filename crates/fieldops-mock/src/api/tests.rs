use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fieldops_core::InMemoryBackend;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{app, AppState};

fn setup_app() -> (Router, AppState) {
    let state = Arc::new(InMemoryBackend::new("mock"));
    (app(state.clone()), state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn square() -> Value {
    json!([
        { "latitude": 55.750, "longitude": 37.610 },
        { "latitude": 55.752, "longitude": 37.610 },
        { "latitude": 55.752, "longitude": 37.613 },
        { "latitude": 55.750, "longitude": 37.613 }
    ])
}

async fn create_field(app: &Router) -> String {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/fields",
            json!({
                "name": "North",
                "culture": "wheat",
                "createdBy": "tgromov",
                "coordinates": square()
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    body["field"]["id"].as_str().expect("field id").to_string()
}

#[tokio::test]
async fn field_crud_uses_envelopes() {
    let (app, _state) = setup_app();
    let id = create_field(&app).await;

    let res = app.clone().oneshot(get("/v1/fields/authors/tgromov")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["fields"].as_array().unwrap().len(), 1);
    assert_eq!(body["fields"][0]["createdBy"], "tgromov");

    let res = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/v1/fields/{id}"),
            json!({ "name": "North", "culture": "barley", "coordinates": square() }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_json(res).await["field"]["culture"], "barley");

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/fields/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.oneshot(get(&format!("/v1/fields/{id}"))).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let (app, _state) = setup_app();
    for uri in [
        "/v1/fields/missing",
        "/v1/drones/missing",
        "/v1/missions/missing",
        "/v1/planner/missions/missing",
    ] {
        let res = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(read_json(res).await["error"].is_string());
    }
}

#[tokio::test]
async fn degenerate_boundary_is_rejected() {
    let (app, state) = setup_app();
    let res = app
        .oneshot(json_request(
            "POST",
            "/v1/fields",
            json!({
                "name": "Line",
                "culture": "wheat",
                "createdBy": "tgromov",
                "coordinates": [
                    { "latitude": 55.75, "longitude": 37.61 },
                    { "latitude": 55.76, "longitude": 37.61 }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(state.fields_by("tgromov").unwrap().is_empty());
}

#[tokio::test]
async fn mission_plan_is_stored_and_served_by_planner() {
    let (app, _state) = setup_app();
    let field_id = create_field(&app).await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/planner/mission",
            json!({ "missionBorders": square(), "type": "MISSION_TYPE_PATROL" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let plan = read_json(res).await["plan"]["coordinates"].clone();
    assert_eq!(plan.as_array().unwrap().len(), 5);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/missions",
            json!({
                "name": "Perimeter",
                "type": "MISSION_TYPE_PATROL",
                "status": "MISSION_STATUS_CREATED",
                "fieldId": field_id,
                "createdBy": "tgromov",
                "plan": { "coordinates": plan }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let mission = read_json(res).await["mission"].clone();
    let id = mission["id"].as_str().unwrap().to_string();
    assert_eq!(mission["type"], "MISSION_TYPE_PATROL");

    let res = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/v1/missions/{id}"),
            json!({
                "name": "Perimeter",
                "status": "MISSION_STATUS_RUNNING",
                "updatedBy": "tgromov",
                "plan": { "coordinates": [] }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated = read_json(res).await;
    assert_eq!(updated["mission"]["status"], "MISSION_STATUS_RUNNING");
    assert_eq!(updated["mission"]["updatedBy"], "tgromov");

    let res = app
        .oneshot(get(&format!("/v1/planner/missions/{id}")))
        .await
        .unwrap();
    let served = read_json(res).await;
    assert!(served["plan"]["coordinates"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn mission_for_unknown_field_is_not_found() {
    let (app, _state) = setup_app();
    let res = app
        .oneshot(json_request(
            "POST",
            "/v1/missions",
            json!({
                "name": "Orphan",
                "type": "MISSION_TYPE_RESEARCH",
                "status": "MISSION_STATUS_CREATED",
                "fieldId": "missing",
                "createdBy": "tgromov",
                "plan": { "coordinates": [] }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn drones_are_scoped_to_author() {
    let (app, _state) = setup_app();
    for author in ["tgromov", "tgromov", "someone"] {
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/drones",
                json!({ "name": "Quad", "createdBy": author }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(read_json(res).await["drone"]["status"], "DRONE_STATUS_AVAILABLE");
    }

    let res = app.oneshot(get("/v1/drones/authors/tgromov")).await.unwrap();
    assert_eq!(read_json(res).await["drones"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn health_check() {
    let (app, _state) = setup_app();
    let res = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
