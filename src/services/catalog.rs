//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{normalize_isbn, AddBookOutcome, Book, CreateBook, DeleteOutcome, GenreTotal},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a catalog row by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Add copies to the catalog.
    /// Copies go to the first row already carrying the ISBN; a new row is
    /// created only when none exists.
    pub async fn add_book(&self, mut book: CreateBook) -> AppResult<AddBookOutcome> {
        book.validate()?;
        book.isbn = normalize_isbn(&book.isbn)?;
        let count = book.count.unwrap_or(1);
        if count < 0 {
            return Err(AppError::Validation("Count cannot be negative".to_string()));
        }

        let mut tx = self.repository.begin_write().await?;

        let existing = self
            .repository
            .books
            .rows_for_isbn(&mut tx, &book.isbn)
            .await?
            .into_iter()
            .next();

        let outcome = match existing {
            Some(row) => {
                let updated = self
                    .repository
                    .books
                    .adjust_count(&mut tx, row.id, count)
                    .await?
                    .ok_or_else(|| AppError::Internal(format!("Book row {} vanished", row.id)))?;
                tracing::info!(
                    "Catalog add: merged {} copies of ISBN {} into row id={} (now {})",
                    count,
                    book.isbn,
                    updated.id,
                    updated.count
                );
                AddBookOutcome {
                    book: updated,
                    merged: true,
                }
            }
            None => {
                let created = self.repository.books.insert(&mut tx, &book, count).await?;
                tracing::info!(
                    "Catalog add: created row id={} for ISBN {} with {} copies",
                    created.id,
                    created.isbn,
                    created.count
                );
                AddBookOutcome {
                    book: created,
                    merged: false,
                }
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Copies on the shelf across every row sharing the ISBN
    pub async fn total_copies(&self, isbn: &str) -> AppResult<i64> {
        let isbn = normalize_isbn(isbn)?;
        self.repository.books.total_copies(&isbn).await
    }

    /// Remove copies of an ISBN.
    ///
    /// `None`, or a count covering every copy, deletes all rows for the ISBN.
    /// Otherwise rows are consumed in ascending id order: a row holding more
    /// than what is left to remove is decremented, any other row is deleted
    /// and the remainder carried to the next one. Running out of rows is not
    /// an error.
    pub async fn delete_by_isbn(
        &self,
        isbn: &str,
        count_to_delete: Option<i64>,
    ) -> AppResult<DeleteOutcome> {
        let isbn = normalize_isbn(isbn)?;
        if let Some(count) = count_to_delete {
            if count < 1 {
                return Err(AppError::Validation(
                    "Count to delete must be at least 1".to_string(),
                ));
            }
        }

        let mut tx = self.repository.begin_write().await?;

        let total = self.repository.books.total_copies_in(&mut tx, &isbn).await?;

        let outcome = match count_to_delete {
            Some(count) if count < total => {
                let mut remaining = count;
                let mut outcome = DeleteOutcome::default();

                for row in self.repository.books.rows_for_isbn(&mut tx, &isbn).await? {
                    if remaining == 0 {
                        break;
                    }
                    if row.count > remaining {
                        self.repository
                            .books
                            .adjust_count(&mut tx, row.id, -remaining)
                            .await?;
                        outcome.copies_removed += remaining;
                        remaining = 0;
                    } else {
                        self.repository.books.delete_row(&mut tx, row.id).await?;
                        outcome.rows_deleted += 1;
                        outcome.copies_removed += row.count;
                        remaining -= row.count;
                    }
                }
                outcome
            }
            _ => DeleteOutcome {
                rows_deleted: self
                    .repository
                    .books
                    .delete_all_for_isbn(&mut tx, &isbn)
                    .await?,
                copies_removed: total,
            },
        };

        tx.commit().await?;

        tracing::info!(
            "Catalog delete: ISBN {} lost {} copies ({} rows removed)",
            isbn,
            outcome.copies_removed,
            outcome.rows_deleted
        );
        Ok(outcome)
    }

    /// Delete every row published in or before `year`
    pub async fn delete_by_year_at_most(&self, year: i32) -> AppResult<DeleteOutcome> {
        let (rows_deleted, copies_removed) =
            self.repository.books.delete_by_year_at_most(year).await?;
        tracing::info!(
            "Catalog delete: {} rows published in or before {} removed",
            rows_deleted,
            year
        );
        Ok(DeleteOutcome {
            rows_deleted,
            copies_removed,
        })
    }

    /// Rows whose title or author contains `term`
    pub async fn search(&self, term: &str) -> AppResult<Vec<Book>> {
        self.repository.books.search(term).await
    }

    /// Rows with copies on the shelf
    pub async fn list_available(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_available().await
    }

    pub async fn top_genres_by_copies(&self) -> AppResult<Vec<GenreTotal>> {
        self.repository.books.top_genres_by_copies().await
    }
}
