//! Identity provider contract.
//!
//! The gateway never interprets provider errors: whatever message the
//! provider returns is surfaced as is.

use async_trait::async_trait;
use thiserror::Error;

/// Caller identity resolved from a bearer token. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Account created by a sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserHandle {
    pub id: String,
    pub email: String,
}

/// Tokens issued by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The provider answered with an error.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The provider could not be reached or answered with garbage.
    #[error("{0}")]
    Transport(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserHandle, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<TokenSet, IdentityError>;

    /// Resolve an access token to the user it was issued for.
    async fn user_info(&self, token: &str) -> Result<User, IdentityError>;
}

/// Extract the local user id from a provider subject such as `auth0|abc123`.
///
/// The id is everything after the first `|`; a subject without a
/// connection prefix is used whole.
pub fn user_id_from_subject(subject: &str) -> &str {
    subject
        .split_once('|')
        .map(|(_, id)| id)
        .unwrap_or(subject)
}
