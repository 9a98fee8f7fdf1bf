//! Membership service: registration, card lookup and borrowing eligibility

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::{
    clock::{add_months, Clock},
    config::CirculationConfig,
    error::{AppError, AppResult},
    models::member::{Member, RegisterMember, RentalStatus},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembershipService {
    repository: Repository,
    config: CirculationConfig,
    clock: Arc<dyn Clock>,
}

impl MembershipService {
    pub fn new(repository: Repository, config: CirculationConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            config,
            clock,
        }
    }

    /// Register a member and issue a fresh card
    pub async fn register(&self, request: RegisterMember) -> AppResult<Member> {
        request.validate()?;
        let full_name = request.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::Validation("Full name cannot be empty".to_string()));
        }

        let card_number = Uuid::new_v4().to_string();
        let valid_until = add_months(self.clock.today(), self.config.membership_validity_months);

        let member = self
            .repository
            .members
            .create(&card_number, full_name, valid_until)
            .await?;

        tracing::info!(
            "Registered member id={} valid until {}",
            member.id,
            member.valid_until
        );
        Ok(member)
    }

    pub async fn find_by_card(&self, card_number: &str) -> AppResult<Member> {
        self.repository.members.get_by_card(card_number).await
    }

    /// Whether the member holds an active rental due before `as_of` (default: today)
    pub async fn has_overdue_active(
        &self,
        user_id: i64,
        as_of: Option<NaiveDate>,
    ) -> AppResult<bool> {
        let as_of = as_of.unwrap_or_else(|| self.clock.today());
        let mut conn = self.repository.pool.acquire().await?;
        self.repository
            .rentals
            .has_overdue_active(&mut conn, user_id, as_of)
            .await
    }

    /// Borrowing eligibility for a card
    pub async fn rental_status(&self, card_number: &str) -> AppResult<RentalStatus> {
        let member = self.find_by_card(card_number).await?;
        let today = self.clock.today();
        let has_overdue = self.has_overdue_active(member.id, Some(today)).await?;

        Ok(RentalStatus {
            card_valid: member.is_valid_on(today),
            card_number: member.card_number,
            has_overdue,
            valid_until: member.valid_until,
        })
    }
}
