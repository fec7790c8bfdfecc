use super::password::hash_password;
use super::tokens::decode_access;
use crate::common::test_helpers::{create_user, extract_response_body, get_json, send_json};
use crate::config::test_helpers::{setup_protected_test_app, setup_test_app};
use crate::users::models::ActiveModel as UserActiveModel;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rstest::rstest;
use sea_orm::ActiveModelTrait;
use sea_orm::ActiveValue::Set;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_login_issues_token_pair() {
    let app = setup_test_app().await;
    create_user(&app, "RF-ADM", "admin@planta.mx", "correct-horse", " Administrador ", true).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/token",
        &json!({"email": "admin@planta.mx", "password": "correct-horse"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Login failed: {body:?}");
    assert_eq!(body["role"], "Administrador");
    assert!(body["access"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["refresh"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_login_accepts_correo_alias() {
    let app = setup_test_app().await;
    create_user(&app, "RF-ADM", "admin@planta.mx", "correct-horse", "administrador", true).await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/token",
        &json!({"correo": "ADMIN@planta.mx", "password": "correct-horse"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[case(json!({}), StatusCode::BAD_REQUEST, "MISSING_CREDENTIALS")]
#[case(json!({"email": "admin@planta.mx"}), StatusCode::BAD_REQUEST, "MISSING_CREDENTIALS")]
#[case(json!({"email": "", "password": "x"}), StatusCode::BAD_REQUEST, "MISSING_CREDENTIALS")]
#[case(json!({"email": "ghost@planta.mx", "password": "correct-horse"}), StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")]
#[case(json!({"email": "admin@planta.mx", "password": "wrong"}), StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")]
#[case(json!({"email": "off@planta.mx", "password": "correct-horse"}), StatusCode::FORBIDDEN, "ACCOUNT_DISABLED")]
#[case(json!({"email": "op@planta.mx", "password": "correct-horse"}), StatusCode::FORBIDDEN, "PERMISSION_DENIED")]
#[tokio::test]
async fn test_login_checks(
    #[case] payload: serde_json::Value,
    #[case] expected_status: StatusCode,
    #[case] expected_code: &str,
) {
    let app = setup_test_app().await;
    create_user(&app, "RF-ADM", "admin@planta.mx", "correct-horse", "administrador", true).await;
    create_user(&app, "RF-OFF", "off@planta.mx", "correct-horse", "administrador", false).await;
    create_user(&app, "RF-OP", "op@planta.mx", "correct-horse", "operador", true).await;

    let (status, body) = send_json(&app, "POST", "/api/token", &payload).await;
    assert_eq!(status, expected_status, "Unexpected response: {body:?}");
    assert_eq!(body["error"]["code"], expected_code);
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_look_the_same() {
    let app = setup_test_app().await;
    create_user(&app, "RF-ADM", "admin@planta.mx", "correct-horse", "administrador", true).await;

    let (_, unknown) = send_json(
        &app,
        "POST",
        "/api/token",
        &json!({"email": "ghost@planta.mx", "password": "correct-horse"}),
    )
    .await;
    let (_, wrong) = send_json(
        &app,
        "POST",
        "/api/token",
        &json!({"email": "admin@planta.mx", "password": "nope"}),
    )
    .await;
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn test_refresh_flow() {
    let app = setup_test_app().await;
    create_user(&app, "RF-ADM", "admin@planta.mx", "correct-horse", "administrador", true).await;
    let (_, tokens) = send_json(
        &app,
        "POST",
        "/api/token",
        &json!({"email": "admin@planta.mx", "password": "correct-horse"}),
    )
    .await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/token/refresh",
        &json!({"refresh": tokens["refresh"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let claims = decode_access(body["access"].as_str().unwrap(), &crate::config::Config::for_tests()).unwrap();
    assert_eq!(claims.rfid, "RF-ADM");

    let (status, body) = send_json(&app, "POST", "/api/token/refresh", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // An access token is not accepted as a refresh token
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/token/refresh",
        &json!({"refresh": tokens["access"]}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let (app, state) = setup_protected_test_app().await;
    UserActiveModel {
        rfid: Set("RF-ADM".to_string()),
        name: Set("Admin".to_string()),
        email: Set("admin@planta.mx".to_string()),
        password_hash: Set(hash_password("correct-horse").unwrap()),
        role: Set("administrador".to_string()),
        active: Set(true),
    }
    .insert(&state.db)
    .await
    .unwrap();

    let (status, body) = get_json(&app, "/api/ingredients").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");

    // Public endpoints stay reachable
    let (status, _) = get_json(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);

    let (status, tokens) = send_json(
        &app,
        "POST",
        "/api/token",
        &json!({"email": "admin@planta.mx", "password": "correct-horse"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/ingredients")
                .header(
                    "authorization",
                    format!("Bearer {}", tokens["access"].as_str().unwrap()),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/dashboard_data")
                .header(
                    "authorization",
                    format!("Bearer {}", tokens["refresh"].as_str().unwrap()),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
