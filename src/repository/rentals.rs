//! Rentals repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::GenreTotal,
        rental::{Rental, RentalDetails},
    },
};

const RENTAL_COLUMNS: &str =
    "id, user_id, book_id, isbn, rental_date, return_date, returned, quantity";

const DETAILS_SELECT: &str = r#"
    SELECT r.id, u.card_number, r.book_id, r.isbn,
           b.title, b.author, b.year, b.genre,
           r.rental_date, r.return_date, r.returned, r.quantity
    FROM rentals r
    JOIN users u ON u.id = r.user_id
    LEFT JOIN books b ON b.id = r.book_id
"#;

#[derive(Clone)]
pub struct RentalsRepository {
    pool: Pool<Sqlite>,
}

impl RentalsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get rental by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>(&format!("SELECT {RENTAL_COLUMNS} FROM rentals WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))
    }

    /// Whether a member holds any active rental due before `as_of`
    pub async fn has_overdue_active(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        as_of: NaiveDate,
    ) -> AppResult<bool> {
        let overdue: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM rentals
            WHERE user_id = ? AND returned = 0 AND quantity > 0 AND return_date < ?
            "#,
        )
        .bind(user_id)
        .bind(as_of)
        .fetch_one(&mut *conn)
        .await?;
        Ok(overdue > 0)
    }

    /// Active rentals of a member for an ISBN, earliest due first
    pub async fn active_for_member_isbn(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        isbn: &str,
    ) -> AppResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(&format!(
            r#"
            SELECT {RENTAL_COLUMNS} FROM rentals
            WHERE user_id = ? AND isbn = ? AND returned = 0 AND quantity > 0
            ORDER BY return_date, id
            "#
        ))
        .bind(user_id)
        .bind(isbn)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rentals)
    }

    /// Record a new active rental against a catalog row
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        book_id: i64,
        isbn: &str,
        rental_date: NaiveDate,
        return_date: NaiveDate,
        quantity: i64,
    ) -> AppResult<Rental> {
        let rental = sqlx::query_as::<_, Rental>(&format!(
            r#"
            INSERT INTO rentals
                (user_id, book_id, isbn, rental_date, return_date, returned, quantity)
            VALUES (?, ?, ?, ?, ?, 0, ?)
            RETURNING {RENTAL_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(book_id)
        .bind(isbn)
        .bind(rental_date)
        .bind(return_date)
        .bind(quantity)
        .fetch_one(&mut *conn)
        .await?;
        Ok(rental)
    }

    /// Mark a rental fully returned
    pub async fn close(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<Rental> {
        let rental = sqlx::query_as::<_, Rental>(&format!(
            "UPDATE rentals SET returned = 1, quantity = 0 WHERE id = ? RETURNING {RENTAL_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(rental)
    }

    /// Take `by` copies off a rental that stays active
    pub async fn reduce(&self, conn: &mut SqliteConnection, id: i64, by: i64) -> AppResult<Rental> {
        let rental = sqlx::query_as::<_, Rental>(&format!(
            "UPDATE rentals SET quantity = quantity - ? WHERE id = ? RETURNING {RENTAL_COLUMNS}"
        ))
        .bind(by)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(rental)
    }

    // =========================================================================
    // REPORTS
    // =========================================================================

    /// All active rentals
    pub async fn list_active(&self) -> AppResult<Vec<RentalDetails>> {
        let rentals = sqlx::query_as::<_, RentalDetails>(&format!(
            "{DETAILS_SELECT} WHERE r.returned = 0 AND r.quantity > 0 ORDER BY r.return_date, r.id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rentals)
    }

    /// Active rentals due before `as_of`
    pub async fn list_overdue(&self, as_of: NaiveDate) -> AppResult<Vec<RentalDetails>> {
        let rentals = sqlx::query_as::<_, RentalDetails>(&format!(
            r#"{DETAILS_SELECT}
            WHERE r.returned = 0 AND r.quantity > 0 AND r.return_date < ?
            ORDER BY r.return_date, r.id"#
        ))
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;
        Ok(rentals)
    }

    /// Copies held past their due date across all members
    pub async fn total_overdue(&self, as_of: NaiveDate) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(quantity), 0) FROM rentals
            WHERE returned = 0 AND return_date < ?
            "#,
        )
        .bind(as_of)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Active rentals of one member
    pub async fn list_active_for_member(&self, user_id: i64) -> AppResult<Vec<RentalDetails>> {
        let rentals = sqlx::query_as::<_, RentalDetails>(&format!(
            r#"{DETAILS_SELECT}
            WHERE r.user_id = ? AND r.returned = 0 AND r.quantity > 0
            ORDER BY r.return_date, r.id"#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rentals)
    }

    /// Top 5 genres by copies currently out on rental
    pub async fn top_genres_by_rented(&self) -> AppResult<Vec<GenreTotal>> {
        let genres = sqlx::query_as::<_, GenreTotal>(
            r#"
            SELECT b.genre AS genre, SUM(r.quantity) AS total
            FROM rentals r
            JOIN books b ON b.id = r.book_id
            WHERE r.returned = 0 AND r.quantity > 0
            GROUP BY b.genre
            ORDER BY total DESC, b.genre
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }
}
