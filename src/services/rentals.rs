//! Rental ledger: renting and returning copies against the catalog

use std::sync::Arc;

use sqlx::SqliteConnection;
use validator::Validate;

use crate::{
    clock::{add_months, Clock},
    config::CirculationConfig,
    error::{AppError, AppResult},
    models::{
        book::normalize_isbn,
        rental::{RentBook, Rental, ReturnBook, ReturnOutcome},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RentalsService {
    repository: Repository,
    config: CirculationConfig,
    clock: Arc<dyn Clock>,
}

impl RentalsService {
    pub fn new(repository: Repository, config: CirculationConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            config,
            clock,
        }
    }

    pub async fn get_rental(&self, id: i64) -> AppResult<Rental> {
        self.repository.rentals.get_by_id(id).await
    }

    /// Rent copies of an ISBN to a card holder.
    ///
    /// The rental is bound to the first catalog row able to cover the whole
    /// quantity; copies are never split across rows. Eligibility checks, the
    /// rental insert and the stock decrement share one transaction.
    pub async fn rent_book(&self, request: RentBook) -> AppResult<Rental> {
        request.validate()?;
        let isbn = normalize_isbn(&request.isbn)?;

        let today = self.clock.today();
        let quantity = request.quantity.unwrap_or(1);
        let due_date = request
            .due_date
            .unwrap_or_else(|| add_months(today, self.config.loan_period_months));

        let mut tx = self.repository.begin_write().await?;

        let member = self
            .repository
            .members
            .find_by_card(&mut tx, &request.card_number)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        if self.config.enforce_card_validity && !member.is_valid_on(today) {
            tracing::info!("Rent refused: card of member id={} expired", member.id);
            return Err(AppError::CardExpired(member.valid_until));
        }

        if self
            .repository
            .rentals
            .has_overdue_active(&mut tx, member.id, today)
            .await?
        {
            tracing::info!("Rent refused: member id={} has overdue rentals", member.id);
            return Err(AppError::OverdueBlock);
        }

        let book = match self
            .repository
            .books
            .first_with_stock(&mut tx, &isbn, quantity)
            .await?
        {
            Some(book) => book,
            None => {
                let available = self.repository.books.max_row_count(&mut tx, &isbn).await?;
                return Err(AppError::InsufficientStock {
                    isbn,
                    requested: quantity,
                    available,
                });
            }
        };

        let rental = self
            .repository
            .rentals
            .create(&mut tx, member.id, book.id, &book.isbn, today, due_date, quantity)
            .await?;

        self.repository
            .books
            .adjust_count(&mut tx, book.id, -quantity)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Rental id={}: member id={} took {} of ISBN {} from row id={}, due {}",
            rental.id,
            member.id,
            quantity,
            rental.isbn,
            book.id,
            rental.return_date
        );
        Ok(rental)
    }

    /// Return copies of an ISBN held by a card holder.
    ///
    /// Active rentals are consumed earliest-due first; `quantity = None`
    /// returns everything outstanding. Stock is credited with exactly the
    /// consumed amount. Asking for more than is outstanding is not an error:
    /// the outstanding part is returned and the rest reported as unfulfilled.
    pub async fn return_book(&self, request: ReturnBook) -> AppResult<ReturnOutcome> {
        request.validate()?;
        let isbn = normalize_isbn(&request.isbn)?;

        let mut tx = self.repository.begin_write().await?;

        let member = self
            .repository
            .members
            .find_by_card(&mut tx, &request.card_number)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        let active = self
            .repository
            .rentals
            .active_for_member_isbn(&mut tx, member.id, &isbn)
            .await?;

        if active.is_empty() {
            return Err(AppError::NoActiveRental { isbn });
        }

        let outstanding: i64 = active.iter().map(|r| r.quantity).sum();
        let requested = request.quantity.unwrap_or(outstanding);
        let mut remaining = requested;
        let mut touched = Vec::new();

        for rental in active {
            if remaining == 0 {
                break;
            }

            let consumed = remaining.min(rental.quantity);
            let updated = if consumed == rental.quantity {
                self.repository.rentals.close(&mut tx, rental.id).await?
            } else {
                self.repository
                    .rentals
                    .reduce(&mut tx, rental.id, consumed)
                    .await?
            };
            remaining -= consumed;

            self.restock(&mut tx, &rental, consumed).await?;
            touched.push(updated);
        }

        tx.commit().await?;

        let outcome = ReturnOutcome {
            requested,
            returned: requested - remaining,
            unfulfilled: remaining,
            rentals: touched,
        };

        if outcome.is_partial() {
            tracing::warn!(
                "Return for member id={} ISBN {}: {} of {} copies could not be returned",
                member.id,
                isbn,
                outcome.unfulfilled,
                outcome.requested
            );
        } else {
            tracing::info!(
                "Return for member id={} ISBN {}: {} copies back on the shelf",
                member.id,
                isbn,
                outcome.returned
            );
        }

        Ok(outcome)
    }

    /// Put returned copies back on the rental's catalog row, or on the first
    /// remaining row for the ISBN if that row was deleted meanwhile.
    async fn restock(
        &self,
        conn: &mut SqliteConnection,
        rental: &Rental,
        copies: i64,
    ) -> AppResult<()> {
        if let Some(book_id) = rental.book_id {
            if self
                .repository
                .books
                .adjust_count(&mut *conn, book_id, copies)
                .await?
                .is_some()
            {
                return Ok(());
            }
        }

        let fallback = self
            .repository
            .books
            .rows_for_isbn(&mut *conn, &rental.isbn)
            .await?
            .into_iter()
            .next();

        match fallback {
            Some(row) => {
                self.repository
                    .books
                    .adjust_count(&mut *conn, row.id, copies)
                    .await?;
            }
            None => {
                tracing::warn!(
                    "Rental id={}: ISBN {} is no longer catalogued, {} copies not restocked",
                    rental.id,
                    rental.isbn,
                    copies
                );
            }
        }
        Ok(())
    }
}
