use anyhow::{bail, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Auth0
    pub auth0_domain: String,
    pub auth0_api_audience: String,
    pub auth0_issuer: String,
    pub auth0_algorithms: Vec<String>,
    pub auth0_client_id: String,
    pub auth0_client_secret: String,
    pub auth0_scopes: String,

    // Dictionary service
    pub dictionary_host: String,
    pub dictionary_port: u16,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let algorithms = std::env::var("AUTH0_ALGORITHMS").unwrap_or_else(|_| "RS256".to_string());

        let config = Self {
            // Auth0
            auth0_domain: std::env::var("AUTH0_DOMAIN").context("AUTH0_DOMAIN not set")?,
            auth0_api_audience: std::env::var("AUTH0_API_AUDIENCE")
                .context("AUTH0_API_AUDIENCE not set")?,
            auth0_issuer: std::env::var("AUTH0_ISSUER").context("AUTH0_ISSUER not set")?,
            auth0_algorithms: parse_list(&algorithms),
            auth0_client_id: std::env::var("AUTH0_CLIENT_ID")
                .context("AUTH0_CLIENT_ID not set")?,
            auth0_client_secret: std::env::var("AUTH0_CLIENT_SECRET")
                .context("AUTH0_CLIENT_SECRET not set")?,
            auth0_scopes: std::env::var("AUTH0_SCOPES")
                .unwrap_or_else(|_| "openid profile email offline_access".to_string()),

            // Dictionary service
            dictionary_host: std::env::var("DICTIONARY_SERVICE_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            dictionary_port: parse_port("DICTIONARY_SERVICE_PORT", 50051)?,

            // Server
            port: parse_port("PORT", 8080)?,
        };

        if config.auth0_algorithms.is_empty() {
            bail!("AUTH0_ALGORITHMS must list at least one algorithm");
        }

        Ok(config)
    }

    /// Base URL of the Auth0 tenant.
    ///
    /// A bare domain gets an `https://` scheme; a domain that already carries
    /// a scheme is used as is (local mocks, proxies).
    pub fn auth0_base_url(&self) -> String {
        let domain = self.auth0_domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        }
    }

    /// Endpoint URI of the dictionary gRPC service.
    pub fn dictionary_uri(&self) -> String {
        format!("http://{}:{}", self.dictionary_host, self.dictionary_port)
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_port(var: &str, default: u16) -> Result<u16> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid port number, got '{}'", var, value)),
        Err(_) => Ok(default),
    }
}
