//! Request authorization.
//!
//! Every request carries a [`RequestAuth`] built from its `Authorization`
//! header. Guarded operations run through [`guarded`], which resolves the
//! caller once per request and short-circuits with a [`GatewayError`] when
//! no user can be found.

use crate::error::GatewayError;
use crate::identity::{IdentityProvider, User};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Extract the bearer token from an `Authorization` header value.
///
/// Returns `None` when the header is absent or holds nothing but the scheme.
pub fn bearer_token(header: Option<&str>) -> Option<String> {
    let value = header?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() || token == "Bearer" {
        None
    } else {
        Some(token.to_string())
    }
}

/// Per-request credential and its lazily resolved user.
///
/// Clones share the same cache, so the provider is asked at most once no
/// matter how many guarded fields a request selects.
#[derive(Clone)]
pub struct RequestAuth {
    inner: Arc<Inner>,
}

struct Inner {
    token: Option<String>,
    identity: Arc<dyn IdentityProvider>,
    resolved: OnceCell<Result<User, GatewayError>>,
}

impl RequestAuth {
    pub fn new(identity: Arc<dyn IdentityProvider>, token: Option<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                token,
                identity,
                resolved: OnceCell::new(),
            }),
        }
    }

    /// A request that presented no credential.
    pub fn anonymous(identity: Arc<dyn IdentityProvider>) -> Self {
        Self::new(identity, None)
    }

    pub fn has_token(&self) -> bool {
        self.inner.token.is_some()
    }

    /// Resolve the caller, asking the identity provider on first use only.
    pub async fn user(&self) -> Result<User, GatewayError> {
        self.inner
            .resolved
            .get_or_init(|| self.resolve())
            .await
            .clone()
    }

    async fn resolve(&self) -> Result<User, GatewayError> {
        let token = self
            .inner
            .token
            .as_deref()
            .ok_or(GatewayError::MissingCredential)?;

        let user = self
            .inner
            .identity
            .user_info(token)
            .await
            .map_err(|e| GatewayError::InvalidCredential(e.to_string()))?;

        if user.id.is_empty() {
            return Err(GatewayError::InvalidCredential(
                "identity provider returned an empty subject".to_string(),
            ));
        }

        debug!("Resolved user {}", user.id);
        Ok(user)
    }
}

/// Run `operation` for the resolved caller, or fail without running it.
pub async fn guarded<T, F, Fut>(auth: &RequestAuth, operation: F) -> Result<T, GatewayError>
where
    F: FnOnce(User) -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
{
    let user = match auth.user().await {
        Ok(user) => user,
        Err(e) => {
            warn!("Rejected guarded operation: {}", e);
            return Err(e);
        }
    };
    operation(user).await
}
