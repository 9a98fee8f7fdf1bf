//! Members repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{conflict_on_unique, AppError, AppResult},
    models::member::Member,
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Sqlite>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Look up a member by library card number
    pub async fn find_by_card(
        &self,
        conn: &mut SqliteConnection,
        card_number: &str,
    ) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT id, card_number, full_name, valid_until FROM users WHERE card_number = ?",
        )
        .bind(card_number)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(member)
    }

    pub async fn get_by_card(&self, card_number: &str) -> AppResult<Member> {
        let mut conn = self.pool.acquire().await?;
        self.find_by_card(&mut conn, card_number)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
    }

    /// Create a new member
    pub async fn create(
        &self,
        card_number: &str,
        full_name: &str,
        valid_until: NaiveDate,
    ) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO users (card_number, full_name, valid_until)
            VALUES (?, ?, ?)
            RETURNING id, card_number, full_name, valid_until
            "#,
        )
        .bind(card_number)
        .bind(full_name)
        .bind(valid_until)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Card number already issued"))
    }
}
