//! Librarian authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::librarian::{CreateLibrarian, Librarian},
};

use super::AuthenticatedLibrarian;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response carrying the bearer token
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT access token
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
    pub librarian: Librarian,
}

/// Log a librarian in
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, librarian) = state
        .services
        .librarians
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.auth.jwt_expiration_hours * 3600,
        librarian,
    }))
}

/// Get the librarian behind the current token
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current librarian", body = Librarian),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(claims): AuthenticatedLibrarian,
) -> AppResult<Json<Librarian>> {
    let librarian = state.services.librarians.get_by_id(claims.librarian_id).await?;
    Ok(Json(librarian))
}

/// Create another librarian account
#[utoipa::path(
    post,
    path = "/librarians",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = CreateLibrarian,
    responses(
        (status = 201, description = "Librarian created", body = Librarian),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_librarian(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(claims): AuthenticatedLibrarian,
    Json(request): Json<CreateLibrarian>,
) -> AppResult<(StatusCode, Json<Librarian>)> {
    let created = state.services.librarians.create(request).await?;
    tracing::info!("Librarian {} created account {}", claims.sub, created.username);
    Ok((StatusCode::CREATED, Json(created)))
}
