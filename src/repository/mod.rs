//! Repository layer for database operations

pub mod books;
pub mod librarians;
pub mod members;
pub mod rentals;

use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite, Transaction,
};

use crate::{config::DatabaseConfig, error::AppResult};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    pub books: books::BooksRepository,
    pub members: members::MembersRepository,
    pub rentals: rentals::RentalsRepository,
    pub librarians: librarians::LibrariansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            members: members::MembersRepository::new(pool.clone()),
            rentals: rentals::RentalsRepository::new(pool.clone()),
            librarians: librarians::LibrariansRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Open a transaction that already holds the write lock
    pub async fn begin_write(&self) -> AppResult<Transaction<'static, Sqlite>> {
        begin_write(&self.pool).await
    }
}

/// Open a transaction and take the SQLite write lock before any read
///
/// A deferred transaction that reads first cannot wait for the lock when it
/// later writes: SQLite answers `SQLITE_BUSY` at once. Taking the lock with a
/// no-op update as the first statement lets the busy timeout queue writers.
pub(crate) async fn begin_write(pool: &Pool<Sqlite>) -> AppResult<Transaction<'static, Sqlite>> {
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE books SET count = count WHERE 0")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Open the SQLite pool described by `config` and bring the schema up to date
pub async fn connect(config: &DatabaseConfig) -> AppResult<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives and dies with its connection
    let in_memory = config.url.contains(":memory:") || config.url.contains("mode=memory");
    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections);
    if in_memory {
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }

    let pool = pool_options.connect_with(options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
