use crate::common::test_helpers::{create_formula, create_ingredient, get_json, send_empty, send_json};
use crate::config::test_helpers::setup_test_app;
use axum::Router;
use axum::http::StatusCode;
use serde_json::{Value, json};
use std::collections::BTreeSet;

async fn setup_production_app() -> Router {
    let app = setup_test_app().await;
    for id in ["SUGAR", "FLOUR", "SALT"] {
        create_ingredient(&app, id).await;
    }
    create_formula(
        &app,
        "PAN-01",
        json!([
            {"ingredient_id": "SUGAR", "quantity": 2.0, "tolerance": 1},
            {"ingredient_id": "FLOUR", "quantity": 20.0, "tolerance": 2}
        ]),
    )
    .await;
    app
}

async fn create_order(app: &Router, payload: Value) -> Value {
    let (status, body) = send_json(app, "POST", "/api/production", &payload).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create production order: {body:?}");
    body
}

fn detail_ingredients(order: &Value) -> BTreeSet<String> {
    order["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["ingredient_id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_production_order_created_with_details() {
    let app = setup_production_app().await;

    let body = create_order(
        &app,
        json!({
            "order_tag": "OP-100",
            "formula_id": "PAN-01",
            "lot": "L-2025-01",
            "target_weight": 22.0,
            "details": [
                {"ingredient_id": "SUGAR", "weighed_amount": 2.25, "max_weight": 2.5, "min_weight": 1.75, "weighed": true},
                {"ingredient_id": "FLOUR"}
            ]
        }),
    )
    .await;

    assert!(body["folio"].as_i64().unwrap() > 0);
    assert_eq!(body["status"], 0, "New orders default to pending");
    assert_eq!(body["formula_name"], "Formula PAN-01");
    assert_eq!(body["details"].as_array().unwrap().len(), 2);
    assert_eq!(body["details"][0]["weighed_amount"], 2.25);
    assert_eq!(body["details"][0]["ingredient_name"], "Ingredient SUGAR");
    assert!(body["details"][1]["weighed_amount"].is_null());
    assert_eq!(body["details"][1]["weighed"], false);
}

#[tokio::test]
async fn test_production_update_reconciles_details() {
    let app = setup_production_app().await;
    let created = create_order(
        &app,
        json!({
            "order_tag": "OP-200",
            "formula_id": "PAN-01",
            "details": [
                {"ingredient_id": "SUGAR", "weighed_amount": 2.0},
                {"ingredient_id": "FLOUR", "weighed_amount": 20.0}
            ]
        }),
    )
    .await;
    let folio = created["folio"].as_i64().unwrap();
    let sugar_detail_id = created["details"][0]["detail_id"].clone();

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/production/{folio}"),
        &json!({
            "status": 1,
            "details": [
                {"ingredient_id": "SUGAR", "weighed": true},
                {"ingredient_id": "SALT", "weighed_amount": 0.5}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Failed to update order: {body:?}");
    assert_eq!(body["status"], 1);
    assert_eq!(
        detail_ingredients(&body),
        BTreeSet::from(["SALT".to_string(), "SUGAR".to_string()])
    );

    let sugar = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["ingredient_id"] == "SUGAR")
        .unwrap();
    assert_eq!(sugar["detail_id"], sugar_detail_id);
    assert_eq!(sugar["weighed_amount"], 2.0, "Absent weight keeps its stored value");
    assert_eq!(sugar["weighed"], true);
}

#[tokio::test]
async fn test_production_update_without_details_keeps_children() {
    let app = setup_production_app().await;
    let created = create_order(
        &app,
        json!({
            "order_tag": "OP-300",
            "details": [{"ingredient_id": "SUGAR"}, {"ingredient_id": "FLOUR"}]
        }),
    )
    .await;
    let folio = created["folio"].as_i64().unwrap();

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/production/{folio}"),
        &json!({"lot": "L-9", "details": []}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lot"], "L-9");
    assert_eq!(body["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_production_rejects_bad_references() {
    let app = setup_production_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/production",
        &json!({"order_tag": "OP-400", "formula_id": "MISSING"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("MISSING"));

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/production",
        &json!({"order_tag": "OP-400", "user_id": "NO-USER"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/production",
        &json!({
            "order_tag": "OP-400",
            "details": [{"ingredient_id": "SUGAR"}, {"ingredient_id": "SUGAR"}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/production",
        &json!({
            "order_tag": "OP-400",
            "details": [{"ingredient_id": "SUGAR", "min_weight": 3.0, "max_weight": 1.0}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get_json(&app, "/api/production").await;
    assert_eq!(body, json!([]), "Rejected writes must not persist anything");
}

#[tokio::test]
async fn test_production_list_filters_by_status() {
    let app = setup_production_app().await;
    create_order(&app, json!({"order_tag": "OP-A", "status": 0})).await;
    create_order(&app, json!({"order_tag": "OP-B", "status": 1})).await;
    create_order(&app, json!({"order_tag": "OP-C", "status": 1})).await;

    let (status, body) = get_json(&app, "/api/production?status=1").await;
    assert_eq!(status, StatusCode::OK);
    let tags: BTreeSet<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["order_tag"].as_str().unwrap())
        .collect();
    assert_eq!(tags, BTreeSet::from(["OP-B", "OP-C"]));

    let (_, body) = get_json(&app, "/api/production").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_production_order_delete() {
    let app = setup_production_app().await;
    let created = create_order(
        &app,
        json!({"order_tag": "OP-500", "details": [{"ingredient_id": "SALT"}]}),
    )
    .await;
    let folio = created["folio"].as_i64().unwrap();

    let (status, _) = send_empty(&app, "DELETE", &format!("/api/production/{folio}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get_json(&app, &format!("/api/production/{folio}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send_empty(&app, "DELETE", &format!("/api/production/{folio}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_orders_by_tag_deactivate_and_delete() {
    let app = setup_production_app().await;
    create_order(&app, json!({"order_tag": "OP-TAG", "status": 1})).await;
    create_order(&app, json!({"order_tag": "OP-TAG", "status": 1, "details": [{"ingredient_id": "SALT"}]})).await;
    create_order(&app, json!({"order_tag": "OP-OTHER", "status": 1})).await;

    let (status, body) = send_empty(&app, "POST", "/api/production/tag/OP-TAG/deactivate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (_, body) = get_json(&app, "/api/production?status=0").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send_empty(&app, "DELETE", "/api/production/tag/OP-TAG").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get_json(&app, "/api/production").await;
    let remaining = body.as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["order_tag"], "OP-OTHER");

    let (status, _) = send_empty(&app, "DELETE", "/api/production/tag/OP-TAG").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send_empty(&app, "POST", "/api/production/tag/OP-TAG/deactivate").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
