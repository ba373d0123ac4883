use thiserror::Error;

/// Message shown for every guarded operation whose caller could not be
/// identified, whatever the underlying reason.
pub const USER_NOT_FOUND: &str = "Can't find user with given credentials";

/// Everything that can go wrong inside a resolver.
///
/// None of these reach the transport as faults: each operation converts its
/// error into the `ErrorResponse` variant of its result union.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Please provide a valid token")]
    MissingCredential,

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("No active training session")]
    NoActiveSession,

    #[error("Can't translate '{0}'")]
    TranslationNotFound(String),

    #[error("Only Greek or Russian languages are supported")]
    UnsupportedScript,

    /// Failure reported by the identity provider or the dictionary service,
    /// carrying its message verbatim.
    #[error("{0}")]
    Collaborator(String),
}

impl GatewayError {
    /// Text placed in the `error` field of an `ErrorResponse`.
    ///
    /// Credential failures collapse to one message so callers cannot tell a
    /// missing token from a rejected one.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::MissingCredential | GatewayError::InvalidCredential(_) => {
                USER_NOT_FOUND.to_string()
            }
            other => other.to_string(),
        }
    }
}
