//! Catalog book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// A catalog row. Several rows may share one ISBN; availability for an ISBN
/// is the sum of their `count`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
    pub genre: String,
    pub isbn: String,
    /// Copies currently on the shelf
    pub count: i64,
}

/// Trim surrounding whitespace off an ISBN; a blank ISBN is rejected
pub fn normalize_isbn(isbn: &str) -> AppResult<String> {
    let isbn = isbn.trim();
    if isbn.is_empty() {
        return Err(AppError::Validation("ISBN cannot be empty".to_string()));
    }
    Ok(isbn.to_string())
}

/// Add book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub genre: String,
    #[validate(length(min = 1, message = "ISBN cannot be empty"))]
    pub isbn: String,
    /// Number of copies to add (default: 1)
    #[validate(range(min = 0, message = "Count cannot be negative"))]
    pub count: Option<i64>,
}

/// Result of adding copies to the catalog
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AddBookOutcome {
    /// The row that now holds the copies
    pub book: Book,
    /// True when the copies were added to an existing row with the same ISBN
    pub merged: bool,
}

/// Result of a catalog deletion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeleteOutcome {
    pub rows_deleted: u64,
    pub copies_removed: i64,
}

/// Book search query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Substring matched against title or author; lists available books when absent
    pub search: Option<String>,
}

/// Partial delete query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DeleteByIsbnQuery {
    /// Copies to remove; all copies when absent
    pub count: Option<i64>,
}

/// Genre with an aggregated number of copies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct GenreTotal {
    pub genre: String,
    pub total: i64,
}
