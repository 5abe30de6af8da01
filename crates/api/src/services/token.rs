//! Token service: issues and validates signed bearer tokens.
//!
//! Tokens are self-contained HS256 JWTs. Every token carries a unique `jti`
//! so it can be revoked individually, a `fresh` flag (set only on tokens
//! minted directly from a login), and an `is_admin` claim computed from the
//! user's role at issuance time. Freshness and the admin claim are immutable
//! until the next issuance.
//!
//! Revocation is external to this service: see
//! [`crate::db::RevokedTokenRepository`].

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use storekeeper_core::UserId;

/// Errors that can occur when issuing or validating tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token's signature or structure is invalid.
    #[error("invalid token")]
    Invalid,

    /// The token has expired.
    #[error("token has expired")]
    Expired,

    /// Signing a new token failed.
    #[error("token signing failed")]
    Signing,
}

/// Claims embedded in every token.
///
/// Refresh tokens share this shape: they are simply non-fresh tokens with a
/// longer lifetime, used to mint new non-fresh access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user id, as a decimal string.
    pub sub: String,
    /// Unique token id, used for revocation tracking.
    pub jti: Uuid,
    /// Whether this token was minted directly from a login.
    pub fresh: bool,
    /// Admin capability, computed from the user's role at issuance.
    pub is_admin: bool,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiration (unix seconds).
    pub exp: i64,
}

impl AccessClaims {
    /// Parse the subject back into a [`UserId`].
    ///
    /// Returns `None` if the subject is not a well-formed id (which means the
    /// token was not minted by this service).
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse::<i32>().ok().map(UserId::new)
    }

    /// The token's expiration instant.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}

/// A fresh access token plus its companion refresh token, as returned by
/// login.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    /// Fresh access token.
    pub access_token: String,
    /// Non-fresh long-lived token for minting new access tokens.
    pub refresh_token: String,
}

/// Issues and validates signed bearer tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Create a token service from a signing secret and lifetimes (seconds).
    #[must_use]
    pub fn new(secret: &SecretString, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        }
    }

    /// Issue an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_access_token(
        &self,
        user_id: UserId,
        is_admin: bool,
        fresh: bool,
    ) -> Result<String, TokenError> {
        self.issue(user_id, is_admin, fresh, self.access_ttl)
    }

    /// Issue a refresh token for a user. Refresh tokens are never fresh.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_refresh_token(&self, user_id: UserId, is_admin: bool) -> Result<String, TokenError> {
        self.issue(user_id, is_admin, false, self.refresh_ttl)
    }

    /// Decode and validate a token, returning its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` if the token is past its expiry, and
    /// `TokenError::Invalid` for any other validation failure (bad signature,
    /// malformed structure, missing claims).
    pub fn decode(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    fn issue(
        &self,
        user_id: UserId,
        is_admin: bool,
        fresh: bool,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4(),
            fresh,
            is_admin,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|_| TokenError::Signing)
    }
}
