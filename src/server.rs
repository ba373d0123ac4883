use crate::auth::bearer_token;
use crate::gateway::Gateway;
use crate::schema::{build_schema, AppSchema};
use async_graphql::http::GraphiQLSource;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    response::Html,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub schema: AppSchema,
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            schema: build_schema(Arc::clone(&gateway)),
            gateway,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Execute one GraphQL request with the caller's bearer token attached.
async fn graphql(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let token = bearer_token(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()));
    let auth = state.gateway.authorize(token);

    Json(state.schema.execute(request.data(auth)).await)
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "active_sessions": state.gateway.sessions().active_sessions(),
    }))
}
