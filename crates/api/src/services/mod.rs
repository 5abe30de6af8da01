//! Business-logic services.
//!
//! - [`token`] - Issues and validates signed bearer tokens
//! - [`auth`] - Registration, login, refresh, logout, account management

pub mod auth;
pub mod token;

pub use auth::{AuthError, AuthService};
pub use token::{AccessClaims, TokenError, TokenPair, TokenService};
