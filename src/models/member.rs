//! Library member (card holder) model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Registered member. The card number is the member's credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub id: i64,
    pub card_number: String,
    pub full_name: String,
    pub valid_until: NaiveDate,
}

impl Member {
    /// Whether the card can still be used on `today`
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        self.valid_until >= today
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterMember {
    #[validate(length(min = 1, max = 200, message = "Full name must be 1 to 200 characters"))]
    pub full_name: String,
}

/// Borrowing eligibility of a member
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RentalStatus {
    pub card_number: String,
    pub has_overdue: bool,
    pub card_valid: bool,
    pub valid_until: NaiveDate,
}
