//! Read-only circulation reports

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    clock::Clock,
    error::AppResult,
    models::{
        book::GenreTotal,
        rental::{OverdueReport, RentalDetails},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl ReportsService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Copies held past their due date, as of `as_of` (default: today)
    pub async fn total_overdue(&self, as_of: Option<NaiveDate>) -> AppResult<i64> {
        let as_of = as_of.unwrap_or_else(|| self.clock.today());
        self.repository.rentals.total_overdue(as_of).await
    }

    pub async fn list_overdue(&self, as_of: Option<NaiveDate>) -> AppResult<Vec<RentalDetails>> {
        let as_of = as_of.unwrap_or_else(|| self.clock.today());
        self.repository.rentals.list_overdue(as_of).await
    }

    /// Overdue rentals together with their total quantity
    pub async fn overdue_report(&self, as_of: Option<NaiveDate>) -> AppResult<OverdueReport> {
        let as_of = Some(as_of.unwrap_or_else(|| self.clock.today()));
        let total_quantity = self.total_overdue(as_of).await?;
        let rentals = self.list_overdue(as_of).await?;
        Ok(OverdueReport {
            total_quantity,
            rentals,
        })
    }

    pub async fn list_active(&self) -> AppResult<Vec<RentalDetails>> {
        self.repository.rentals.list_active().await
    }

    /// Active rentals of the member holding `card_number`
    pub async fn member_rentals(&self, card_number: &str) -> AppResult<Vec<RentalDetails>> {
        let member = self.repository.members.get_by_card(card_number).await?;
        self.repository.rentals.list_active_for_member(member.id).await
    }

    /// Top 5 genres by copies currently out on rental
    pub async fn top_genres_by_rented(&self) -> AppResult<Vec<GenreTotal>> {
        self.repository.rentals.top_genres_by_rented().await
    }

    /// Top 5 genres by copies on the shelf
    pub async fn top_genres_by_copies(&self) -> AppResult<Vec<GenreTotal>> {
        self.repository.books.top_genres_by_copies().await
    }
}
