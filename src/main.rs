use anyhow::{Context, Result};
use lexicon_gateway::{
    auth0::Auth0Client,
    config::Config,
    dictionary::GrpcDictionaryClient,
    gateway::Gateway,
    server::{router, AppState},
    training::SessionStore,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lexicon_gateway=info".parse()?),
        )
        .init();

    info!("Starting lexicon gateway");

    // Load configuration from environment
    let config = Config::from_env()?;
    info!(
        "Auth0 tenant {} (issuer {}, algorithms {})",
        config.auth0_domain,
        config.auth0_issuer,
        config.auth0_algorithms.join(",")
    );
    info!("Dictionary service at {}", config.dictionary_uri());

    let gateway = Arc::new(Gateway::new(
        Arc::new(Auth0Client::new(&config)),
        Arc::new(GrpcDictionaryClient::from_config(&config)),
        SessionStore::default(),
    ));
    let app = router(AppState::new(gateway));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("✓ Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
