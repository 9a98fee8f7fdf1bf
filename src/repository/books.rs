//! Books repository for database operations

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, GenreTotal},
};

const BOOK_COLUMNS: &str = "id, title, author, year, genre, isbn, count";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Get book row by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// All rows sharing an ISBN, in first-fetched (ascending id) order
    pub async fn rows_for_isbn(
        &self,
        conn: &mut SqliteConnection,
        isbn: &str,
    ) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE isbn = ? ORDER BY id"
        ))
        .bind(isbn)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    /// First row for an ISBN able to cover `quantity` copies on its own
    pub async fn first_with_stock(
        &self,
        conn: &mut SqliteConnection,
        isbn: &str,
        quantity: i64,
    ) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE isbn = ? AND count >= ? ORDER BY id LIMIT 1"
        ))
        .bind(isbn)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(book)
    }

    /// Largest copy count held by a single row for an ISBN
    pub async fn max_row_count(&self, conn: &mut SqliteConnection, isbn: &str) -> AppResult<i64> {
        let max: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(count), 0) FROM books WHERE isbn = ?")
                .bind(isbn)
                .fetch_one(&mut *conn)
                .await?;
        Ok(max)
    }

    /// Sum of copies across every row sharing an ISBN
    pub async fn total_copies_in(
        &self,
        conn: &mut SqliteConnection,
        isbn: &str,
    ) -> AppResult<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(count), 0) FROM books WHERE isbn = ?")
                .bind(isbn)
                .fetch_one(&mut *conn)
                .await?;
        Ok(total)
    }

    pub async fn total_copies(&self, isbn: &str) -> AppResult<i64> {
        let mut conn = self.pool.acquire().await?;
        self.total_copies_in(&mut conn, isbn).await
    }

    /// Rows with at least one copy on the shelf
    pub async fn list_available(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE count > 0 ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Rows whose title or author contains `term`
    pub async fn search(&self, term: &str) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {BOOK_COLUMNS} FROM books
            WHERE title LIKE '%' || ?1 || '%'
               OR author LIKE '%' || ?1 || '%'
            ORDER BY id
            "#
        ))
        .bind(term)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Top 5 genres by copies on the shelf
    pub async fn top_genres_by_copies(&self) -> AppResult<Vec<GenreTotal>> {
        let genres = sqlx::query_as::<_, GenreTotal>(
            r#"
            SELECT genre, SUM(count) AS total
            FROM books
            GROUP BY genre
            ORDER BY total DESC, genre
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Insert a new catalog row holding `count` copies
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        book: &CreateBook,
        count: i64,
    ) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, year, genre, isbn, count)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(&book.genre)
        .bind(&book.isbn)
        .bind(count)
        .fetch_one(&mut *conn)
        .await?;
        Ok(created)
    }

    /// Shift a row's copy count by `delta` (negative to take copies away)
    pub async fn adjust_count(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        delta: i64,
    ) -> AppResult<Option<Book>> {
        let updated = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET count = count + ? WHERE id = ? RETURNING {BOOK_COLUMNS}"
        ))
        .bind(delta)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(updated)
    }

    pub async fn delete_row(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete every row for an ISBN, returning the number of rows removed
    pub async fn delete_all_for_isbn(
        &self,
        conn: &mut SqliteConnection,
        isbn: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every row published in or before `year`; returns (rows, copies)
    pub async fn delete_by_year_at_most(&self, year: i32) -> AppResult<(u64, i64)> {
        let mut tx = super::begin_write(&self.pool).await?;

        let copies: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(count), 0) FROM books WHERE year <= ?")
                .bind(year)
                .fetch_one(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM books WHERE year <= ?")
            .bind(year)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((result.rows_affected(), copies))
    }
}
