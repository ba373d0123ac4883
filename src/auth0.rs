use crate::config::Config;
use crate::identity::{
    user_id_from_subject, IdentityError, IdentityProvider, TokenSet, User, UserHandle,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Database connection that holds username/password accounts.
const CONNECTION: &str = "Username-Password-Authentication";

/// Resource-owner password grant restricted to one realm.
const PASSWORD_REALM_GRANT: &str = "http://auth0.com/oauth/grant-type/password-realm";

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    client_id: &'a str,
    email: &'a str,
    password: &'a str,
    connection: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    #[serde(rename = "_id", alias = "id", default)]
    id: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    username: &'a str,
    password: &'a str,
    realm: &'a str,
    audience: &'a str,
    scope: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    sub: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

/// Error bodies differ between Auth0 endpoints; the first populated field wins.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    description: Option<String>,
    message: Option<String>,
    error: Option<String>,
    code: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        [
            self.error_description,
            self.description,
            self.message,
            self.error,
            self.code,
        ]
        .into_iter()
        .flatten()
        .find(|m| !m.trim().is_empty())
    }
}

/// Auth0 authentication API client.
pub struct Auth0Client {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    audience: String,
    scopes: String,
}

impl Auth0Client {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.auth0_base_url(),
            client_id: config.auth0_client_id.clone(),
            client_secret: config.auth0_client_secret.clone(),
            audience: config.auth0_api_audience.clone(),
            scopes: config.auth0_scopes.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl IdentityProvider for Auth0Client {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserHandle, IdentityError> {
        let request = SignupRequest {
            client_id: &self.client_id,
            email,
            password,
            connection: CONNECTION,
        };

        let response = self
            .http
            .post(self.url("/dbconnections/signup"))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let created: SignupResponse = response.json().await.map_err(transport_error)?;
        debug!("Auth0 account created for {}", created.email);

        Ok(UserHandle {
            id: created.id,
            email: created.email,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<TokenSet, IdentityError> {
        let request = TokenRequest {
            grant_type: PASSWORD_REALM_GRANT,
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            username: email,
            password,
            realm: CONNECTION,
            audience: &self.audience,
            scope: &self.scopes,
        };

        let response = self
            .http
            .post(self.url("/oauth/token"))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let tokens: TokenResponse = response.json().await.map_err(transport_error)?;

        Ok(TokenSet {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        })
    }

    async fn user_info(&self, token: &str) -> Result<User, IdentityError> {
        let response = self
            .http
            .get(self.url("/userinfo"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let info: UserInfoResponse = response.json().await.map_err(transport_error)?;

        Ok(User {
            id: user_id_from_subject(&info.sub).to_string(),
            name: info.name,
            email: info.email,
        })
    }
}

fn transport_error(err: reqwest::Error) -> IdentityError {
    warn!("Auth0 request failed: {}", err);
    IdentityError::Transport(err.to_string())
}

/// Turn a non-2xx Auth0 response into an error carrying the provider's message.
async fn rejection(response: reqwest::Response) -> IdentityError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body.trim().to_string()
            }
        });

    debug!("Auth0 rejected request ({}): {}", status, message);

    IdentityError::Rejected {
        status: status.as_u16(),
        message,
    }
}
