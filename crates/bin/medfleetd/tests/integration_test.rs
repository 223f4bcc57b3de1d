//! End-to-end smoke tests for the full medfleetd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real
//! repos, real services, real axum router) and exercises the HTTP layer
//! via `tower::ServiceExt::oneshot` — no TCP port is bound.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use medfleet_adapter_http_axum::router;
use medfleet_adapter_http_axum::state::AppState;
use medfleet_adapter_storage_sqlite_sqlx::{
    Config, SqliteAppUserRepository, SqliteDroneRepository, SqliteMedicationRepository,
};
use medfleet_app::event_bus::InProcessEventBus;
use medfleet_app::services::auth_service::AuthService;
use medfleet_app::services::drone_service::DroneService;
use medfleet_app::token::TokenSigner;

/// Build a fully-wired router backed by an in-memory `SQLite` database,
/// plus a bearer token obtained through the sign-up endpoint.
async fn app() -> (axum::Router, String) {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let pool = db.pool().clone();

    let drone_repo = SqliteDroneRepository::new(pool.clone());
    let medication_repo = SqliteMedicationRepository::new(pool.clone());
    let user_repo = SqliteAppUserRepository::new(pool);

    let event_bus = InProcessEventBus::new(256);
    let signer = Arc::new(TokenSigner::new("integration-secret", 24));

    let state = AppState::new(
        DroneService::new(drone_repo, medication_repo, event_bus).with_serialized_operations(),
        AuthService::new(user_repo, Arc::clone(&signer)),
        signer,
    );

    let app = router::build(state);

    let (status, body) = post_json(
        &app,
        "/auth/sign_up",
        None,
        serde_json::json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "password": "correct-horse",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let token = body["token"].as_str().expect("sign_up should return a token").to_string();

    (app, token)
}

async fn get(app: &axum::Router, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    into_json(response).await
}

async fn post_json(
    app: &axum::Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    into_json(response).await
}

async fn post_empty(
    app: &axum::Router,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    into_json(response).await
}

async fn into_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

fn registration(serial_number: &str, battery_capacity: u8) -> serde_json::Value {
    serde_json::json!({
        "serial_number": serial_number,
        "model": "Lightweight",
        "weight_limit": 150.0,
        "battery_capacity": battery_capacity,
    })
}

// ---------------------------------------------------------------------------
// Health & authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let (app, _) = app().await;
    let (status, _) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn should_reject_fleet_routes_without_token() {
    let (app, _) = app().await;

    let (status, _) = get(&app, "/drones/get_idles", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post_json(&app, "/drones/register", None, registration("DRN-001", 40)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_sign_in_registered_user() {
    let (app, _) = app().await;

    let (status, body) = post_json(
        &app,
        "/auth/sign_in",
        None,
        serde_json::json!({"email": "ada@example.com", "password": "correct-horse"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn should_reject_sign_in_with_wrong_password() {
    let (app, _) = app().await;

    let (status, _) = post_json(
        &app,
        "/auth/sign_in",
        None,
        serde_json::json!({"email": "ada@example.com", "password": "wrong-horse"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_duplicate_sign_up() {
    let (app, _) = app().await;

    let (status, _) = post_json(
        &app,
        "/auth/sign_up",
        None,
        serde_json::json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "password": "correct-horse",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Registration & queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_register_drone_and_report_battery() {
    let (app, token) = app().await;
    let token = Some(token.as_str());

    let (status, body) = post_json(&app, "/drones/register", token, registration("DRN-001", 40)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["serial_number"], "DRN-001");
    assert_eq!(body["state"], "IDLE");

    let (status, body) = get(&app, "/drones/check_battery/DRN-001", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!(40));
}

#[tokio::test]
async fn should_reject_duplicate_serial_number() {
    let (app, token) = app().await;
    let token = Some(token.as_str());

    post_json(&app, "/drones/register", token, registration("DRN-001", 40)).await;
    let (status, _) = post_json(&app, "/drones/register", token, registration("DRN-001", 80)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_drone() {
    let (app, token) = app().await;
    let token = Some(token.as_str());

    let (status, _) = get(&app, "/drones/check_battery/DRN-404", token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delivery lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_complete_full_delivery_cycle() {
    let (app, token) = app().await;
    let token = Some(token.as_str());

    post_json(&app, "/drones/register", token, registration("DRN-001", 40)).await;

    let (status, body) = get(&app, "/drones/get_idles", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Aspirin (50 g) + Tylenol (45 g) against a 150 g limit
    let (status, _) = post_json(
        &app,
        "/drones/load/DRN-001",
        token,
        serde_json::json!(["ASPI004", "TYLE003"]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/drones/get_loads/DRN-001", token).await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["ASPI004", "TYLE003"]);

    // a loaded drone is no longer idle
    let (_, body) = get(&app, "/drones/get_idles", token).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    // loading again is illegal in LOADED state
    let (status, _) = post_json(
        &app,
        "/drones/load/DRN-001",
        token,
        serde_json::json!(["ATIV010"]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);

    let (status, _) = post_empty(&app, "/drones/deliver/DRN-001", token).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/drones/get_loads/DRN-001", token).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    // delivering twice is illegal in DELIVERED state
    let (status, _) = post_empty(&app, "/drones/deliver/DRN-001", token).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);

    let (status, _) = post_empty(&app, "/drones/return/DRN-001", token).await;
    assert_eq!(status, StatusCode::OK);

    // home again: idle and available
    let (_, body) = get(&app, "/drones/get_idles", token).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_unload_loaded_drone_and_tolerate_repeats() {
    let (app, token) = app().await;
    let token = Some(token.as_str());

    post_json(&app, "/drones/register", token, registration("DRN-001", 40)).await;
    post_json(
        &app,
        "/drones/load/DRN-001",
        token,
        serde_json::json!(["ASPI004"]),
    )
    .await;

    let (status, _) = post_empty(&app, "/drones/unload/DRN-001", token).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/drones/get_loads/DRN-001", token).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    // unloading an idle drone is a harmless no-op
    let (status, _) = post_empty(&app, "/drones/unload/DRN-001", token).await;
    assert_eq!(status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Load validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reject_empty_load() {
    let (app, token) = app().await;
    let token = Some(token.as_str());

    post_json(&app, "/drones/register", token, registration("DRN-001", 40)).await;

    let (status, _) = post_json(&app, "/drones/load/DRN-001", token, serde_json::json!([])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_reject_load_below_battery_floor() {
    let (app, token) = app().await;
    let token = Some(token.as_str());

    post_json(&app, "/drones/register", token, registration("DRN-001", 10)).await;

    let (status, body) = post_json(
        &app,
        "/drones/load/DRN-001",
        token,
        serde_json::json!(["ASPI004"]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert!(body["error"].as_str().unwrap().contains("25"));
}

#[tokio::test]
async fn should_reject_load_with_unknown_medication() {
    let (app, token) = app().await;
    let token = Some(token.as_str());

    post_json(&app, "/drones/register", token, registration("DRN-001", 40)).await;

    let (status, body) = post_json(
        &app,
        "/drones/load/DRN-001",
        token,
        serde_json::json!(["ASPI004", "NOPE999"]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("NOPE999"));

    // the failed load must not have touched the drone
    let (_, body) = get(&app, "/drones/get_loads/DRN-001", token).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
    let (_, body) = get(&app, "/drones/get_idles", token).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_load_exceeding_weight_limit() {
    let (app, token) = app().await;
    let token = Some(token.as_str());

    post_json(&app, "/drones/register", token, registration("DRN-001", 40)).await;

    // Wellbutrin (70 g) + Naproxen (65 g) + Zoloft (60 g) = 195 g > 150 g
    let (status, _) = post_json(
        &app,
        "/drones/load/DRN-001",
        token,
        serde_json::json!(["WELL014", "NAPE011", "ZOLO020"]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);

    let (_, body) = get(&app, "/drones/get_loads/DRN-001", token).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}
