//! Library circulation server
//!
//! A REST JSON API for a small lending library: a catalog of books counted
//! per ISBN, members identified by card numbers, and a rental ledger that
//! keeps shelf stock in step with what is lent out.

use std::sync::Arc;

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
