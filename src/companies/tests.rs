use crate::common::test_helpers::{get_json, send_empty, send_json};
use crate::config::test_helpers::setup_test_app;
use axum::http::StatusCode;
use serde_json::{Value, json};

fn company_payload(tax_id: &str) -> Value {
    json!({
        "tax_id": tax_id,
        "name": "Alimentos del Norte",
        "street": "Av. Industrial 120",
        "neighborhood": "Parque Industrial",
        "city": "Monterrey",
        "state": "Nuevo Leon",
        "postal_code": "64000",
        "contact": "Laura Medina",
        "email": "contacto@alimentosnorte.mx",
        "phone": "8181234567",
        "logo": "logos/alimentos.png"
    })
}

#[tokio::test]
async fn test_company_crud_operations() {
    let app = setup_test_app().await;

    let (status, body) = send_json(&app, "POST", "/api/companies", &company_payload("ANO010101AB1")).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create company: {body:?}");
    assert_eq!(body["tax_id"], "ANO010101AB1");
    assert_eq!(body["logo"], "logos/alimentos.png");

    let (status, body) = get_json(&app, "/api/companies/ANO010101AB1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Monterrey");

    let (status, body) = send_json(
        &app,
        "PATCH",
        "/api/companies/ANO010101AB1",
        &json!({"phone": "8187654321"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Failed to patch company: {body:?}");
    assert_eq!(body["phone"], "8187654321");
    assert_eq!(body["name"], "Alimentos del Norte", "Absent fields must be kept");

    let (status, body) = get_json(&app, "/api/companies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send_empty(&app, "DELETE", "/api/companies/ANO010101AB1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get_json(&app, "/api/companies/ANO010101AB1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_company_logo_can_be_cleared() {
    let app = setup_test_app().await;
    send_json(&app, "POST", "/api/companies", &company_payload("LOGO990101XY9")).await;

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/companies/LOGO990101XY9",
        &json!({"logo": null}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["logo"].is_null());
    assert_eq!(body["contact"], "Laura Medina");
}

#[tokio::test]
async fn test_duplicate_tax_id_is_rejected() {
    let app = setup_test_app().await;

    let (status, _) = send_json(&app, "POST", "/api/companies", &company_payload("DUP010101AA1")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(&app, "POST", "/api/companies", &company_payload("DUP010101AA1")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE_RESOURCE");
}

#[tokio::test]
async fn test_company_missing_fields_is_validation_error() {
    let app = setup_test_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/companies",
        &json!({"tax_id": "INC010101AA1", "name": "Incomplete"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_company_update_and_delete() {
    let app = setup_test_app().await;

    let (status, _) = send_json(&app, "PATCH", "/api/companies/NOPE", &json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_empty(&app, "DELETE", "/api/companies/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
