use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

pub async fn extract_response_body(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({"error": "Invalid JSON response"}))
    };
    (status, body)
}

pub async fn send_json(app: &Router, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    extract_response_body(response).await
}

pub async fn send_empty(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    extract_response_body(response).await
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send_empty(app, "GET", uri).await
}

pub async fn create_ingredient(app: &Router, ingredient_id: &str) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/ingredients",
        &json!({
            "ingredient_id": ingredient_id,
            "name": format!("Ingredient {ingredient_id}"),
            "unit_size": 25.0,
            "notes": null,
            "weighed": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create ingredient: {body:?}");
    body
}

pub async fn create_formula(app: &Router, formula_id: &str, lines: Value) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/formulas",
        &json!({
            "formula_id": formula_id,
            "batch_code": format!("B-{formula_id}"),
            "name": format!("Formula {formula_id}"),
            "lines": lines
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create formula: {body:?}");
    body
}

pub async fn create_user(app: &Router, rfid: &str, email: &str, password: &str, role: &str, active: bool) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/users",
        &json!({
            "rfid": rfid,
            "name": format!("User {rfid}"),
            "email": email,
            "password": password,
            "role": role,
            "active": active
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create user: {body:?}");
    body
}
