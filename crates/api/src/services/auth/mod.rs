//! Authentication service.
//!
//! Registration, password login, token refresh, logout (revocation), and
//! account lookup/removal. Password hashing uses Argon2id; the hash is
//! opaque everywhere outside this module.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use storekeeper_core::{UserId, Username};

use crate::db::RepositoryError;
use crate::db::revoked_tokens::RevokedTokenRepository;
use crate::db::users::UserRepository;
use crate::models::user::User;
use crate::services::token::{TokenPair, TokenService};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles user registration, login, and token lifecycle.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    revoked: RevokedTokenRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(pool),
            revoked: RevokedTokenRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user with a username and password.
    ///
    /// The first account ever registered becomes the admin; everyone after
    /// that is a regular user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        // Validate username
        let username = Username::parse(username)?;

        // Validate password
        validate_password(password)?;

        // Hash password
        let password_hash = hash_password(password)?;

        // Create user
        let user = self
            .users
            .create(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with a username and password.
    ///
    /// Returns a fresh access token and a non-fresh refresh token. The
    /// `is_admin` claim is computed from the user's role here, at issuance.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        // Validate username format; a malformed name can't match any account
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        // Get user with password hash
        let (user, password_hash) = self
            .users
            .get_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Verify password
        verify_password(password, &password_hash)?;

        let is_admin = user.role.is_admin();
        let access_token = self.tokens.issue_access_token(user.id, is_admin, true)?;
        let refresh_token = self.tokens.issue_refresh_token(user.id, is_admin)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Mint a new non-fresh access token for an already-authenticated user.
    ///
    /// The user's role is re-read so the `is_admin` claim reflects the role
    /// at this issuance, not the one baked into the presented token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account no longer exists.
    pub async fn refresh_access_token(&self, user_id: UserId) -> Result<String, AuthError> {
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = self
            .tokens
            .issue_access_token(user.id, user.role.is_admin(), false)?;

        Ok(token)
    }

    /// Revoke the presented token by its id.
    ///
    /// Idempotent; the token's own expiry bounds how long the revocation
    /// record must be kept.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the registry write fails.
    pub async fn logout(&self, jti: Uuid, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        self.revoked.revoke(jti, expires_at).await?;
        Ok(())
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Delete a user account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn delete_user(&self, user_id: UserId) -> Result<(), AuthError> {
        self.users.delete(user_id).await.map_err(|e| match e {
            RepositoryError::NotFound => AuthError::UserNotFound,
            other => AuthError::Repository(other),
        })
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
