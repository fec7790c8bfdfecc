use super::models::InventoryQuery;
use super::services::inventory;
use crate::common::test_helpers::{create_ingredient, get_json, send_json};
use crate::config::test_helpers::setup_test_state;
use crate::routes::build_router;
use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;

#[tokio::test]
async fn test_inventory_totals_and_window() {
    let state = setup_test_state().await;
    let app = build_router(&state.db, &state.config);
    create_ingredient(&app, "A").await;
    create_ingredient(&app, "B").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/production",
        &json!({
            "order_tag": "OP-1",
            "target_weight": 10.0,
            "status": 1,
            "timestamp": "2025-03-18T08:00:00Z",
            "details": [
                {"ingredient_id": "A", "weighed_amount": 6.5, "weighed": true},
                {"ingredient_id": "B", "weighed_amount": 4.25, "weighed": true}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    send_json(
        &app,
        "POST",
        "/api/production",
        &json!({"order_tag": "OP-2", "timestamp": "2025-03-19T08:00:00Z"}),
    )
    .await;
    send_json(
        &app,
        "POST",
        "/api/production",
        &json!({"order_tag": "OP-OLD", "timestamp": "2025-02-01T08:00:00Z"}),
    )
    .await;

    let now = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
    let rows = inventory(&state.db, &InventoryQuery::default(), now).await.unwrap();

    let tags: Vec<&str> = rows.iter().map(|r| r.order_tag.as_str()).collect();
    assert_eq!(tags, vec!["OP-2", "OP-1"]);

    let first = &rows[1];
    assert_eq!(first.actual_weight, Decimal::new(1075, 2));
    assert_eq!(first.difference, Decimal::new(75, 2));
    assert_eq!(first.ingredients.len(), 2);
    assert_eq!(first.ingredients[0].ingredient_name.as_deref(), Some("Ingredient A"));

    // No target and nothing weighed
    assert_eq!(rows[0].actual_weight, Decimal::ZERO);
    assert_eq!(rows[0].difference, Decimal::ZERO);

    let completed_only = InventoryQuery {
        status: Some("1".to_string()),
        ..Default::default()
    };
    let rows = inventory(&state.db, &completed_only, now).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].order_tag, "OP-1");

    let february = InventoryQuery {
        from: Some("2025-02-01".to_string()),
        to: Some("2025-02-01".to_string()),
        status: Some("todos".to_string()),
    };
    let rows = inventory(&state.db, &february, now).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].order_tag, "OP-OLD");
}

#[tokio::test]
async fn test_inventory_endpoint_rejects_bad_status() {
    let state = setup_test_state().await;
    let app = build_router(&state.db, &state.config);

    let (status, body) = get_json(&app, "/api/inventory").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = get_json(&app, "/api/inventory?status=done").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}
