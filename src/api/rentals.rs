//! Rent and return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::rental::{RentBook, Rental, ReturnBook, ReturnOutcome},
};

use super::AuthenticatedLibrarian;

/// Get a rental ledger entry, active or returned
#[utoipa::path(
    get,
    path = "/rentals/{id}",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Rental ID")
    ),
    responses(
        (status = 200, description = "Rental", body = Rental),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn get_rental(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
    Path(id): Path<i64>,
) -> AppResult<Json<Rental>> {
    let rental = state.services.rentals.get_rental(id).await?;
    Ok(Json(rental))
}

/// Rent copies of a book
#[utoipa::path(
    post,
    path = "/rentals",
    tag = "rentals",
    request_body = RentBook,
    responses(
        (status = 201, description = "Rental created", body = Rental),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Unknown card"),
        (status = 409, description = "Not enough copies on a single catalog row"),
        (status = 422, description = "Member has overdue rentals or an expired card")
    )
)]
pub async fn rent_book(
    State(state): State<crate::AppState>,
    Json(request): Json<RentBook>,
) -> AppResult<(StatusCode, Json<Rental>)> {
    let rental = state.services.rentals.rent_book(request).await?;
    Ok((StatusCode::CREATED, Json(rental)))
}

/// Return copies of a book (everything outstanding when no quantity is given)
#[utoipa::path(
    post,
    path = "/rentals/return",
    tag = "rentals",
    request_body = ReturnBook,
    responses(
        (
            status = 200,
            description = "Copies returned; `unfulfilled` > 0 when more was asked than outstanding",
            body = ReturnOutcome
        ),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Unknown card or nothing outstanding for this ISBN")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Json(request): Json<ReturnBook>,
) -> AppResult<Json<ReturnOutcome>> {
    let outcome = state.services.rentals.return_book(request).await?;
    Ok(Json(outcome))
}
