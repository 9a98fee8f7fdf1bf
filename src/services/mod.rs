//! Business logic services

pub mod catalog;
pub mod librarians;
pub mod membership;
pub mod rentals;
pub mod reports;

use std::sync::Arc;

use crate::{clock::Clock, config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub membership: membership::MembershipService,
    pub rentals: rentals::RentalsService,
    pub reports: reports::ReportsService,
    pub librarians: librarians::LibrariansService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            membership: membership::MembershipService::new(
                repository.clone(),
                config.circulation.clone(),
                clock.clone(),
            ),
            rentals: rentals::RentalsService::new(
                repository.clone(),
                config.circulation.clone(),
                clock.clone(),
            ),
            reports: reports::ReportsService::new(repository.clone(), clock),
            librarians: librarians::LibrariansService::new(repository.clone(), config.auth.clone()),
            repository,
        }
    }
}
