//! Circulation report endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::{
        book::GenreTotal,
        rental::{OverdueReport, RentalDetails},
    },
};

use super::AuthenticatedLibrarian;

/// Overdue report query
#[derive(Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct OverdueQuery {
    /// Reference date (default: today)
    pub as_of: Option<NaiveDate>,
}

/// Genre rankings
#[derive(Serialize, ToSchema)]
pub struct GenresResponse {
    /// Top 5 genres by copies on the shelf
    pub by_copies: Vec<GenreTotal>,
    /// Top 5 genres by copies out on rental
    pub by_rented: Vec<GenreTotal>,
}

/// Overdue rentals and the total overdue quantity
#[utoipa::path(
    get,
    path = "/reports/overdue",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(OverdueQuery),
    responses(
        (status = 200, description = "Overdue rentals", body = OverdueReport),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn overdue(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
    Query(query): Query<OverdueQuery>,
) -> AppResult<Json<OverdueReport>> {
    let report = state.services.reports.overdue_report(query.as_of).await?;
    Ok(Json(report))
}

/// All active rentals
#[utoipa::path(
    get,
    path = "/reports/rentals",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (
            status = 200,
            description = "Active rentals, earliest due first",
            body = Vec<RentalDetails>
        ),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn active_rentals(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
) -> AppResult<Json<Vec<RentalDetails>>> {
    let rentals = state.services.reports.list_active().await?;
    Ok(Json(rentals))
}

/// Top genres by shelf copies and by rented copies
#[utoipa::path(
    get,
    path = "/reports/genres",
    tag = "reports",
    responses(
        (status = 200, description = "Genre rankings", body = GenresResponse)
    )
)]
pub async fn genres(State(state): State<crate::AppState>) -> AppResult<Json<GenresResponse>> {
    let by_copies = state.services.reports.top_genres_by_copies().await?;
    let by_rented = state.services.reports.top_genres_by_rented().await?;
    Ok(Json(GenresResponse { by_copies, by_rented }))
}
