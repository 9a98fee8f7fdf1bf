//! API handlers for the circulation REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod members;
pub mod openapi;
pub mod rentals;
pub mod reports;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::librarian::LibrarianClaims, AppState};

/// Extractor for an authenticated librarian from a JWT bearer token
pub struct AuthenticatedLibrarian(pub LibrarianClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedLibrarian {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Authentication("Invalid authorization header format".to_string())
        })?;

        let claims = state.services.librarians.validate_token(token)?;

        Ok(AuthenticatedLibrarian(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/librarians", post(auth::create_librarian))
        // Catalog
        .route("/books", get(books::list_books).post(books::add_book))
        .route("/books/:id", get(books::get_book))
        .route("/books/isbn/:isbn/copies", get(books::total_copies))
        .route("/books/isbn/:isbn", delete(books::delete_by_isbn))
        .route("/books/year/:year", delete(books::delete_by_year))
        // Members
        .route("/members", post(members::register))
        .route("/members/:card", get(members::get_member))
        .route("/members/:card/status", get(members::rental_status))
        .route("/members/:card/rentals", get(members::member_rentals))
        // Rentals
        .route("/rentals", post(rentals::rent_book))
        .route("/rentals/return", post(rentals::return_book))
        .route("/rentals/:id", get(rentals::get_rental))
        // Reports
        .route("/reports/overdue", get(reports::overdue))
        .route("/reports/rentals", get(reports::active_rentals))
        .route("/reports/genres", get(reports::genres))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
