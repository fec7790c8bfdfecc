use crate::common::test_helpers::{create_formula, create_ingredient, get_json, send_empty, send_json};
use crate::config::test_helpers::setup_test_app;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_ingredient_crud_operations() {
    let app = setup_test_app().await;

    let body = create_ingredient(&app, "ING-AZ").await;
    assert_eq!(body["ingredient_id"], "ING-AZ");
    assert_eq!(body["unit_size"], 25.0);
    assert_eq!(body["weighed"], true);

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/ingredients/ING-AZ",
        &json!({"unit_size": 50.5, "notes": "Refrigerate"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Failed to update ingredient: {body:?}");
    assert_eq!(body["unit_size"], 50.5);
    assert_eq!(body["notes"], "Refrigerate");
    assert_eq!(body["name"], "Ingredient ING-AZ");

    let (status, body) = get_json(&app, "/api/ingredients").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send_empty(&app, "DELETE", "/api/ingredients/ING-AZ").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send_empty(&app, "DELETE", "/api/ingredients/ING-AZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_negative_unit_size_is_rejected() {
    let app = setup_test_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/ingredients",
        &json!({"ingredient_id": "NEG", "name": "Negative", "unit_size": -1.0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_deleting_ingredient_removes_formula_lines() {
    let app = setup_test_app().await;
    create_ingredient(&app, "ING-1").await;
    create_ingredient(&app, "ING-2").await;
    create_formula(
        &app,
        "F-DEL",
        json!([
            {"ingredient_id": "ING-1", "quantity": 10.0, "tolerance": 2},
            {"ingredient_id": "ING-2", "quantity": 5.0, "tolerance": 1}
        ]),
    )
    .await;

    let (status, _) = send_empty(&app, "DELETE", "/api/ingredients/ING-1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get_json(&app, "/api/formulas/F-DEL").await;
    assert_eq!(status, StatusCode::OK);
    let lines = body["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["ingredient_id"], "ING-2");
}
