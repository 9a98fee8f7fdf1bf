//! Librarian accounts and authentication

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::librarian::{CreateLibrarian, Librarian, LibrarianClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct LibrariansService {
    repository: Repository,
    config: AuthConfig,
}

impl LibrariansService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate a librarian and return a JWT token
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<(String, Librarian)> {
        let librarian = self
            .repository
            .librarians
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&librarian, password)? {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.create_token(&librarian)?;
        tracing::info!("Librarian {} logged in", librarian.username);
        Ok((token, librarian))
    }

    /// Validate a bearer token and return its claims
    pub fn validate_token(&self, token: &str) -> AppResult<LibrarianClaims> {
        LibrarianClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))
    }

    fn create_token(&self, librarian: &Librarian) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = LibrarianClaims {
            sub: librarian.username.clone(),
            librarian_id: librarian.id,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, librarian: &Librarian, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&librarian.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Librarian> {
        self.repository.librarians.get_by_id(id).await
    }

    /// Create a librarian account
    pub async fn create(&self, request: CreateLibrarian) -> AppResult<Librarian> {
        request.validate()?;
        let username = request.username.trim();
        let password_hash = self.hash_password(&request.password)?;

        let librarian = self
            .repository
            .librarians
            .create(username, &password_hash, request.full_name.trim())
            .await?;

        tracing::info!("Created librarian {} (id={})", librarian.username, librarian.id);
        Ok(librarian)
    }

    /// Create the configured bootstrap account when no librarian exists yet
    pub async fn ensure_bootstrap(&self) -> AppResult<Option<Librarian>> {
        let (Some(username), Some(password)) = (
            self.config.bootstrap_username.as_deref(),
            self.config.bootstrap_password.as_deref(),
        ) else {
            return Ok(None);
        };

        if self.repository.librarians.count().await? > 0 {
            return Ok(None);
        }

        let full_name = self
            .config
            .bootstrap_full_name
            .clone()
            .unwrap_or_else(|| "Administrator".to_string());

        let librarian = self
            .create(CreateLibrarian {
                username: username.to_string(),
                password: password.to_string(),
                full_name,
            })
            .await?;

        tracing::warn!(
            "Bootstrap librarian {} created, change its password before going to production",
            librarian.username
        );
        Ok(Some(librarian))
    }
}
