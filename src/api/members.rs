//! Member endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        member::{Member, RegisterMember, RentalStatus},
        rental::RentalDetails,
    },
};

/// Register a member and issue a card
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = RegisterMember,
    responses(
        (status = 201, description = "Member registered", body = Member),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterMember>,
) -> AppResult<(StatusCode, Json<Member>)> {
    let member = state.services.membership.register(request).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Look up a member by card number
#[utoipa::path(
    get,
    path = "/members/{card}",
    tag = "members",
    params(
        ("card" = String, Path, description = "Card number")
    ),
    responses(
        (status = 200, description = "Member", body = Member),
        (status = 404, description = "Unknown card")
    )
)]
pub async fn get_member(
    State(state): State<crate::AppState>,
    Path(card): Path<String>,
) -> AppResult<Json<Member>> {
    let member = state.services.membership.find_by_card(&card).await?;
    Ok(Json(member))
}

/// Borrowing eligibility of a member
#[utoipa::path(
    get,
    path = "/members/{card}/status",
    tag = "members",
    params(
        ("card" = String, Path, description = "Card number")
    ),
    responses(
        (status = 200, description = "Eligibility", body = RentalStatus),
        (status = 404, description = "Unknown card")
    )
)]
pub async fn rental_status(
    State(state): State<crate::AppState>,
    Path(card): Path<String>,
) -> AppResult<Json<RentalStatus>> {
    let status = state.services.membership.rental_status(&card).await?;
    Ok(Json(status))
}

/// Active rentals of a member
#[utoipa::path(
    get,
    path = "/members/{card}/rentals",
    tag = "members",
    params(
        ("card" = String, Path, description = "Card number")
    ),
    responses(
        (
            status = 200,
            description = "Active rentals, earliest due first",
            body = Vec<RentalDetails>
        ),
        (status = 404, description = "Unknown card")
    )
)]
pub async fn member_rentals(
    State(state): State<crate::AppState>,
    Path(card): Path<String>,
) -> AppResult<Json<Vec<RentalDetails>>> {
    let rentals = state.services.reports.member_rentals(&card).await?;
    Ok(Json(rentals))
}
