//! Librarians repository for database operations

use sqlx::{Pool, Sqlite};

use crate::{
    error::{conflict_on_unique, AppError, AppResult},
    models::librarian::Librarian,
};

#[derive(Clone)]
pub struct LibrariansRepository {
    pool: Pool<Sqlite>,
}

impl LibrariansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Librarian> {
        sqlx::query_as::<_, Librarian>(
            "SELECT id, username, password_hash, full_name FROM librarians WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Librarian with id {} not found", id)))
    }

    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<Librarian>> {
        let librarian = sqlx::query_as::<_, Librarian>(
            "SELECT id, username, password_hash, full_name FROM librarians WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(librarian)
    }

    /// Create a librarian; `password_hash` must already be hashed
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        full_name: &str,
    ) -> AppResult<Librarian> {
        sqlx::query_as::<_, Librarian>(
            r#"
            INSERT INTO librarians (username, password_hash, full_name)
            VALUES (?, ?, ?)
            RETURNING id, username, password_hash, full_name
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(full_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Username already exists"))
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM librarians")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
