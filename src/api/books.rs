//! Catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{AddBookOutcome, Book, BookQuery, CreateBook, DeleteByIsbnQuery, DeleteOutcome},
};

use super::AuthenticatedLibrarian;

/// Copies on the shelf for one ISBN
#[derive(Serialize, ToSchema)]
pub struct CopiesResponse {
    pub isbn: String,
    pub copies: i64,
}

/// Search books by title or author, or list available books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching catalog rows", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => state.services.catalog.search(term).await?,
        _ => state.services.catalog.list_available().await?,
    };
    Ok(Json(books))
}

/// Get a catalog row by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book row ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Add copies to the catalog, merging into an existing row with the same ISBN
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "New catalog row created", body = AddBookOutcome),
        (status = 200, description = "Copies merged into an existing row", body = AddBookOutcome),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<AddBookOutcome>)> {
    let outcome = state.services.catalog.add_book(book).await?;
    let status = if outcome.merged { StatusCode::OK } else { StatusCode::CREATED };
    Ok((status, Json(outcome)))
}

/// Total copies on the shelf for an ISBN
#[utoipa::path(
    get,
    path = "/books/isbn/{isbn}/copies",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "ISBN")
    ),
    responses(
        (status = 200, description = "Copy count (0 for unknown ISBNs)", body = CopiesResponse)
    )
)]
pub async fn total_copies(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<CopiesResponse>> {
    let copies = state.services.catalog.total_copies(&isbn).await?;
    Ok(Json(CopiesResponse {
        isbn: isbn.trim().to_string(),
        copies,
    }))
}

/// Remove copies of an ISBN (all of them when no count is given)
#[utoipa::path(
    delete,
    path = "/books/isbn/{isbn}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "ISBN"),
        DeleteByIsbnQuery
    ),
    responses(
        (status = 200, description = "Copies removed", body = DeleteOutcome),
        (status = 400, description = "Invalid count"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn delete_by_isbn(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
    Path(isbn): Path<String>,
    Query(query): Query<DeleteByIsbnQuery>,
) -> AppResult<Json<DeleteOutcome>> {
    let outcome = state.services.catalog.delete_by_isbn(&isbn, query.count).await?;
    Ok(Json(outcome))
}

/// Remove every book published in or before a year
#[utoipa::path(
    delete,
    path = "/books/year/{year}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("year" = i32, Path, description = "Latest publication year to remove")
    ),
    responses(
        (status = 200, description = "Rows removed", body = DeleteOutcome),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn delete_by_year(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
    Path(year): Path<i32>,
) -> AppResult<Json<DeleteOutcome>> {
    let outcome = state.services.catalog.delete_by_year_at_most(year).await?;
    Ok(Json(outcome))
}
