//! Rental ledger model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Rental row. Never deleted: an active rental is either reduced by a
/// partial return or closed with `returned = true, quantity = 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rental {
    pub id: i64,
    pub user_id: i64,
    /// Catalog row the copies were taken from; cleared if that row is deleted
    pub book_id: Option<i64>,
    pub isbn: String,
    pub rental_date: NaiveDate,
    /// Due date
    pub return_date: NaiveDate,
    pub returned: bool,
    pub quantity: i64,
}

/// Rental joined with member and catalog data for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RentalDetails {
    pub id: i64,
    pub card_number: String,
    pub book_id: Option<i64>,
    pub isbn: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub rental_date: NaiveDate,
    pub return_date: NaiveDate,
    pub returned: bool,
    pub quantity: i64,
}

/// Rent request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RentBook {
    #[validate(length(min = 1, message = "Card number cannot be empty"))]
    pub card_number: String,
    #[validate(length(min = 1, message = "ISBN cannot be empty"))]
    pub isbn: String,
    /// Due date (default: one loan period from today)
    pub due_date: Option<NaiveDate>,
    /// Number of copies (default: 1)
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i64>,
}

/// Return request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReturnBook {
    #[validate(length(min = 1, message = "Card number cannot be empty"))]
    pub card_number: String,
    #[validate(length(min = 1, message = "ISBN cannot be empty"))]
    pub isbn: String,
    /// Copies to return; everything outstanding when absent
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i64>,
}

/// Result of a return. `unfulfilled > 0` means the request exceeded what
/// was outstanding; the outstanding part was still returned.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnOutcome {
    pub requested: i64,
    pub returned: i64,
    pub unfulfilled: i64,
    /// Rentals touched by the return, after the update
    pub rentals: Vec<Rental>,
}

impl ReturnOutcome {
    pub fn is_partial(&self) -> bool {
        self.unfulfilled > 0
    }
}

/// Overdue rentals with their summed quantity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OverdueReport {
    pub total_quantity: i64,
    pub rentals: Vec<RentalDetails>,
}
