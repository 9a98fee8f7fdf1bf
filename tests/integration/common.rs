//! Shared helpers for integration tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

use circulation_server::{
    api,
    clock::FixedClock,
    config::{AppConfig, AuthConfig, DatabaseConfig},
    repository::{self, Repository},
    services::Services,
    AppState,
};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Day the test server believes it is
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

/// Build the full router over a fresh in-memory database with a bootstrap librarian
pub async fn spawn_app() -> Router {
    let config = AppConfig {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "integration-secret".to_string(),
            jwt_expiration_hours: 1,
            bootstrap_username: Some(ADMIN_USERNAME.to_string()),
            bootstrap_password: Some(ADMIN_PASSWORD.to_string()),
            bootstrap_full_name: Some("Head Librarian".to_string()),
        },
        ..AppConfig::default()
    };

    let pool = repository::connect(&config.database)
        .await
        .expect("Failed to open in-memory database");
    let clock = Arc::new(FixedClock(today()));
    let services = Services::new(Repository::new(pool), &config, clock);
    services
        .librarians
        .ensure_bootstrap()
        .await
        .expect("Failed to create bootstrap librarian");

    api::create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

/// Send one request and decode the JSON body (Null when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response is not JSON")
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, token, None).await
}

/// Log in as the bootstrap librarian and return the bearer token
pub async fn get_auth_token(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("No token in response").to_string()
}

/// Register a member and return the issued card number
pub async fn register_member(app: &Router, full_name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/members",
        None,
        Some(json!({ "full_name": full_name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["card_number"].as_str().expect("No card number").to_string()
}

/// Add copies of a book as a librarian
pub async fn add_book(app: &Router, token: &str, book: Value) -> (StatusCode, Value) {
    send(app, Method::POST, "/api/v1/books", Some(token), Some(book)).await
}
