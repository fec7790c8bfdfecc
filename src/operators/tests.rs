use crate::common::test_helpers::{get_json, send_empty, send_json};
use crate::config::test_helpers::setup_test_app;
use axum::Router;
use axum::http::StatusCode;
use serde_json::json;

async fn create_station(app: &Router, station_id: &str) {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/stations",
        &json!({"station_id": station_id, "name": format!("Station {station_id}")}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create station: {body:?}");
}

async fn create_operator(app: &Router, rfid: &str, station_id: &str, active: bool) {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/operators",
        &json!({
            "rfid": rfid,
            "name": format!("Operator {rfid}"),
            "password": "1234",
            "station_id": station_id,
            "active": active
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create operator: {body:?}");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_operator_requires_existing_station() {
    let app = setup_test_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/operators",
        &json!({"rfid": "OP1", "name": "Nobody", "password": "1234", "station_id": "NOPE"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, body) = get_json(&app, "/api/operators").await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_operator_active_filter() {
    let app = setup_test_app().await;
    create_station(&app, "ST1").await;
    create_operator(&app, "OP1", "ST1", true).await;
    create_operator(&app, "OP2", "ST1", false).await;
    create_operator(&app, "OP3", "ST1", true).await;

    let (status, body) = get_json(&app, "/api/operators?active=true").await;
    assert_eq!(status, StatusCode::OK);
    let rfids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["rfid"].as_str().unwrap())
        .collect();
    assert_eq!(rfids, vec!["OP1", "OP3"]);

    let (_, body) = get_json(&app, "/api/operators?active=false").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get_json(&app, "/api/operators").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_operator_update_and_delete() {
    let app = setup_test_app().await;
    create_station(&app, "ST1").await;
    create_station(&app, "ST2").await;
    create_operator(&app, "OP1", "ST1", true).await;

    let (status, body) = send_json(&app, "PATCH", "/api/operators/OP1", &json!({"station_id": "ST2"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["station_id"], "ST2");
    assert_eq!(body["active"], true);

    let (status, _) = send_json(&app, "PUT", "/api/operators/OP1", &json!({"station_id": "GONE"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_empty(&app, "DELETE", "/api/operators/OP1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send_empty(&app, "DELETE", "/api/operators/OP1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
