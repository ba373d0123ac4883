//! GraphQL schema.
//!
//! Resolvers are thin: they pull the shared [`Gateway`] and the request's
//! [`RequestAuth`] out of the context and delegate. A request executed
//! without an attached `RequestAuth` is treated as anonymous.

pub mod types;

use crate::auth::RequestAuth;
use crate::gateway::Gateway;
use async_graphql::{Context, EmptySubscription, Object, Result, Schema};
use std::sync::Arc;
use types::{DictionaryInput, LoginInput, LoginResult, StandardResponse, TrainingSessionResult};

pub type AppSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn build_schema(gateway: Arc<Gateway>) -> AppSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(gateway)
        .finish()
}

fn gateway<'a>(ctx: &'a Context<'_>) -> Result<&'a Arc<Gateway>> {
    ctx.data::<Arc<Gateway>>()
}

fn request_auth(ctx: &Context<'_>, gateway: &Gateway) -> RequestAuth {
    ctx.data_opt::<RequestAuth>()
        .cloned()
        .unwrap_or_else(|| RequestAuth::anonymous(gateway.identity()))
}

pub struct Query;

#[Object]
impl Query {
    async fn hello(&self) -> &'static str {
        "Hello world"
    }

    async fn get_translation(&self, ctx: &Context<'_>, word: String) -> Result<StandardResponse> {
        Ok(gateway(ctx)?.translate(&word))
    }

    async fn start_training(&self, ctx: &Context<'_>) -> Result<TrainingSessionResult> {
        let gateway = gateway(ctx)?;
        let auth = request_auth(ctx, gateway);
        Ok(gateway.start_training(&auth).await)
    }
}

pub struct Mutation;

#[Object]
impl Mutation {
    async fn sign_up(&self, ctx: &Context<'_>, credentials: LoginInput) -> Result<LoginResult> {
        Ok(gateway(ctx)?.sign_up(&credentials).await)
    }

    async fn sign_in(&self, ctx: &Context<'_>, credentials: LoginInput) -> Result<LoginResult> {
        Ok(gateway(ctx)?.sign_in(&credentials).await)
    }

    async fn add_word(
        &self,
        ctx: &Context<'_>,
        new_word: DictionaryInput,
    ) -> Result<StandardResponse> {
        let gateway = gateway(ctx)?;
        let auth = request_auth(ctx, gateway);
        Ok(gateway.add_word(&auth, &new_word).await)
    }

    async fn submit_answer(
        &self,
        ctx: &Context<'_>,
        answer: String,
    ) -> Result<TrainingSessionResult> {
        let gateway = gateway(ctx)?;
        let auth = request_auth(ctx, gateway);
        Ok(gateway.submit_answer(&auth, &answer).await)
    }

    async fn stop_training(&self, ctx: &Context<'_>) -> Result<StandardResponse> {
        let gateway = gateway(ctx)?;
        let auth = request_auth(ctx, gateway);
        Ok(gateway.stop_training(&auth).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{AddWordReply, DictionaryClient, DictionaryError};
    use crate::identity::{IdentityError, IdentityProvider, TokenSet, User, UserHandle};
    use crate::training::SessionStore;
    use async_trait::async_trait;

    struct RejectAll;

    #[async_trait]
    impl IdentityProvider for RejectAll {
        async fn sign_up(&self, _: &str, _: &str) -> Result<UserHandle, IdentityError> {
            Err(IdentityError::Transport("offline".to_string()))
        }

        async fn sign_in(&self, _: &str, _: &str) -> Result<TokenSet, IdentityError> {
            Err(IdentityError::Transport("offline".to_string()))
        }

        async fn user_info(&self, _: &str) -> Result<User, IdentityError> {
            Err(IdentityError::Transport("offline".to_string()))
        }
    }

    struct NoDictionary;

    #[async_trait]
    impl DictionaryClient for NoDictionary {
        async fn add_word(&self, _: &str, _: &str, _: &str) -> Result<AddWordReply, DictionaryError> {
            Err(DictionaryError::Rpc("offline".to_string()))
        }
    }

    fn create_schema() -> AppSchema {
        build_schema(Arc::new(Gateway::new(
            Arc::new(RejectAll),
            Arc::new(NoDictionary),
            SessionStore::default(),
        )))
    }

    #[tokio::test]
    async fn test_hello() {
        let response = create_schema().execute("{ hello }").await;

        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            serde_json::json!({ "hello": "Hello world" })
        );
    }

    #[tokio::test]
    async fn test_get_translation_union() {
        let query = r#"{
            found: getTranslation(word: "кот") {
                __typename
                ... on SuccessResponse { message }
            }
            missing: getTranslation(word: "hello") {
                __typename
                ... on ErrorResponse { error }
            }
        }"#;

        let response = create_schema().execute(query).await;

        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            serde_json::json!({
                "found": { "__typename": "SuccessResponse", "message": "γάτα" },
                "missing": {
                    "__typename": "ErrorResponse",
                    "error": "Only Greek or Russian languages are supported"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_guarded_field_without_request_auth() {
        let query = r#"{
            startTraining {
                __typename
                ... on ErrorResponse { error }
            }
        }"#;

        let response = create_schema().execute(query).await;

        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            serde_json::json!({
                "startTraining": {
                    "__typename": "ErrorResponse",
                    "error": "Can't find user with given credentials"
                }
            })
        );
    }

    #[test]
    fn test_sdl_declares_result_unions() {
        let sdl = create_schema().sdl();

        for union in ["StandardResponse", "LoginResult", "SubmitAnswerResult"] {
            assert!(sdl.contains(&format!("union {}", union)), "missing union {}", union);
        }
        assert!(sdl.contains("SuccessResponse | ErrorResponse"));
        assert!(sdl.contains("TrainingSession | ErrorResponse | SuccessResponse"));
        assert!(sdl.contains("submitAnswer("));
        assert!(sdl.contains("addWord("));
    }
}
