//! Resolver dispatch: every operation of the API, transport aside.
//!
//! Each method returns one variant of its result union. Errors from the
//! session store, the identity provider or the dictionary service are
//! turned into `ErrorResponse` here and never escape.

use crate::auth::{guarded, RequestAuth};
use crate::dictionary::DictionaryClient;
use crate::error::GatewayError;
use crate::i18n::{detect_language, Language, Lexicon};
use crate::identity::IdentityProvider;
use crate::schema::types::{
    DictionaryInput, LoginInput, LoginResult, StandardResponse, TrainingSessionResult,
};
use crate::training::SessionStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

const START_TRAINING_FIRST: &str = "Please start the training session first!";
const TRAINING_NOT_STARTED: &str = "You are didn't start the training yet!";
const TRAINING_FINISHED: &str = "Training session finished!";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct Gateway {
    identity: Arc<dyn IdentityProvider>,
    dictionary: Arc<dyn DictionaryClient>,
    sessions: SessionStore,
    lexicon: &'static Lexicon,
}

impl Gateway {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        dictionary: Arc<dyn DictionaryClient>,
        sessions: SessionStore,
    ) -> Self {
        Self {
            identity,
            dictionary,
            sessions,
            lexicon: Lexicon::get(),
        }
    }

    pub fn identity(&self) -> Arc<dyn IdentityProvider> {
        Arc::clone(&self.identity)
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Build the per-request authorization context for a bearer token.
    pub fn authorize(&self, token: Option<String>) -> RequestAuth {
        RequestAuth::new(self.identity(), token)
    }

    // ==================== Translation ====================

    pub fn translate(&self, word: &str) -> StandardResponse {
        match self.lookup(word) {
            Ok(translation) => StandardResponse::success(translation),
            Err(e) => e.into(),
        }
    }

    fn lookup(&self, word: &str) -> Result<&'static str, GatewayError> {
        let language = detect_language(word);
        debug!("Translating '{}' ({})", word, language.code());
        if language == Language::Other {
            return Err(GatewayError::UnsupportedScript);
        }
        self.lexicon
            .translate(language, word)
            .ok_or_else(|| GatewayError::TranslationNotFound(word.to_string()))
    }

    // ==================== Accounts ====================

    pub async fn sign_up(&self, credentials: &LoginInput) -> LoginResult {
        let account = match self
            .identity
            .sign_up(&credentials.email, &credentials.password)
            .await
        {
            Ok(account) => account,
            Err(e) => {
                warn!("Sign-up failed: {}", e);
                return GatewayError::Collaborator(e.to_string()).into();
            }
        };

        info!("✓ New account registered: {}", account.id);
        self.sign_in(credentials).await
    }

    /// Exchange credentials for tokens, checking the access token resolves
    /// to a user before handing it out.
    pub async fn sign_in(&self, credentials: &LoginInput) -> LoginResult {
        let tokens = match self
            .identity
            .sign_in(&credentials.email, &credentials.password)
            .await
        {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Sign-in failed: {}", e);
                return GatewayError::Collaborator(e.to_string()).into();
            }
        };

        if tokens.access_token.is_empty() {
            return LoginResult::error(INVALID_CREDENTIALS);
        }

        if let Err(e) = self.identity.user_info(&tokens.access_token).await {
            warn!("Issued token did not resolve to a user: {}", e);
            return GatewayError::Collaborator(e.to_string()).into();
        }

        tokens.into()
    }

    // ==================== Training ====================

    pub async fn start_training(&self, auth: &RequestAuth) -> TrainingSessionResult {
        let result = guarded(auth, |user| async move {
            info!("Starting training for user {}", user.id);
            Ok::<_, GatewayError>(self.sessions.start(&user.id))
        })
        .await;

        match result {
            Ok(step) => step.into(),
            Err(e) => e.into(),
        }
    }

    pub async fn submit_answer(&self, auth: &RequestAuth, answer: &str) -> TrainingSessionResult {
        let result = guarded(auth, |user| async move {
            self.sessions.submit(&user.id, answer)
        })
        .await;

        match result {
            Ok(step) => step.into(),
            Err(GatewayError::NoActiveSession) => {
                TrainingSessionResult::error(START_TRAINING_FIRST)
            }
            Err(e) => e.into(),
        }
    }

    pub async fn stop_training(&self, auth: &RequestAuth) -> StandardResponse {
        let result = guarded(auth, |user| async move { self.sessions.stop(&user.id) }).await;

        match result {
            Ok(()) => StandardResponse::success(TRAINING_FINISHED),
            Err(GatewayError::NoActiveSession) => StandardResponse::error(TRAINING_NOT_STARTED),
            Err(e) => e.into(),
        }
    }

    // ==================== Dictionary ====================

    pub async fn add_word(&self, auth: &RequestAuth, new_word: &DictionaryInput) -> StandardResponse {
        let result = guarded(auth, |user| async move {
            let reply = match self
                .dictionary
                .add_word(&user.id, &new_word.word, &new_word.translation)
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Dictionary service unavailable: {}", e);
                    return Err(GatewayError::Collaborator(e.to_string()));
                }
            };

            if reply.is_success() {
                Ok(reply.message)
            } else {
                warn!(
                    "Dictionary service refused word ({}): {}",
                    reply.status_code, reply.message
                );
                Err(GatewayError::Collaborator(reply.message))
            }
        })
        .await;

        match result {
            Ok(message) => StandardResponse::success(message),
            Err(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{AddWordReply, DictionaryError};
    use crate::identity::{IdentityError, TokenSet, User, UserHandle};
    use crate::schema::types::{ErrorResponse, TrainingSession};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ==================== Test Doubles ====================

    /// Provider that accepts one password and issues `token-<email>` tokens.
    struct FakeIdentity {
        reject_sign_up: Option<String>,
    }

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        async fn sign_up(&self, email: &str, _: &str) -> Result<UserHandle, IdentityError> {
            match &self.reject_sign_up {
                Some(message) => Err(IdentityError::Rejected {
                    status: 400,
                    message: message.clone(),
                }),
                None => Ok(UserHandle {
                    id: "new-user".to_string(),
                    email: email.to_string(),
                }),
            }
        }

        async fn sign_in(&self, email: &str, password: &str) -> Result<TokenSet, IdentityError> {
            if password != "s3cret!" {
                return Err(IdentityError::Rejected {
                    status: 403,
                    message: "Wrong email or password.".to_string(),
                });
            }
            Ok(TokenSet {
                access_token: format!("token-{}", email),
                refresh_token: "refresh".to_string(),
                expires_in: 86400,
            })
        }

        async fn user_info(&self, token: &str) -> Result<User, IdentityError> {
            match token.strip_prefix("token-") {
                Some(email) => Ok(User {
                    id: email.to_string(),
                    name: email.to_string(),
                    email: email.to_string(),
                }),
                None => Err(IdentityError::Rejected {
                    status: 401,
                    message: "Unauthorized".to_string(),
                }),
            }
        }
    }

    /// Dictionary that records calls and answers with a fixed reply.
    struct FakeDictionary {
        reply: Result<AddWordReply, String>,
        calls: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl DictionaryClient for FakeDictionary {
        async fn add_word(
            &self,
            user_id: &str,
            word: &str,
            translation: &str,
        ) -> Result<AddWordReply, DictionaryError> {
            self.calls.lock().unwrap().push((
                user_id.to_string(),
                word.to_string(),
                translation.to_string(),
            ));
            self.reply.clone().map_err(DictionaryError::Rpc)
        }
    }

    fn create_gateway(reply: Result<AddWordReply, String>) -> (Gateway, Arc<FakeDictionary>) {
        let dictionary = Arc::new(FakeDictionary {
            reply,
            calls: Mutex::new(Vec::new()),
        });
        let gateway = Gateway::new(
            Arc::new(FakeIdentity {
                reject_sign_up: None,
            }),
            dictionary.clone(),
            SessionStore::default(),
        );
        (gateway, dictionary)
    }

    fn ok_reply() -> Result<AddWordReply, String> {
        Ok(AddWordReply {
            status_code: 200,
            message: "Word added".to_string(),
        })
    }

    fn login(password: &str) -> LoginInput {
        LoginInput {
            email: "anna@example.com".to_string(),
            password: password.to_string(),
        }
    }

    fn error(message: &str) -> ErrorResponse {
        ErrorResponse::new(message)
    }

    // ==================== translate Tests ====================

    #[test]
    fn test_translate_both_directions() {
        let (gateway, _) = create_gateway(ok_reply());

        assert_eq!(gateway.translate("кот"), StandardResponse::success("γάτα"));
        assert_eq!(gateway.translate("γάτα"), StandardResponse::success("кот"));
    }

    #[test]
    fn test_translate_unknown_word() {
        let (gateway, _) = create_gateway(ok_reply());

        assert_eq!(
            gateway.translate("собака"),
            StandardResponse::error("Can't translate 'собака'")
        );
    }

    #[test]
    fn test_translate_unsupported_script() {
        let (gateway, _) = create_gateway(ok_reply());

        for word in ["hello", "", "123", "кот γάτα"] {
            assert_eq!(
                gateway.translate(word),
                StandardResponse::error("Only Greek or Russian languages are supported")
            );
        }
    }

    // ==================== Account Tests ====================

    #[tokio::test]
    async fn test_sign_in_success() {
        let (gateway, _) = create_gateway(ok_reply());

        let result = gateway.sign_in(&login("s3cret!")).await;

        match result {
            LoginResult::AuthPayload(payload) => {
                assert_eq!(payload.access_token, "token-anna@example.com");
                assert_eq!(payload.refresh_token, "refresh");
                assert_eq!(payload.expires_in, 86400);
            }
            other => panic!("expected AuthPayload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_is_verbatim() {
        let (gateway, _) = create_gateway(ok_reply());

        let result = gateway.sign_in(&login("nope")).await;

        assert_eq!(result, LoginResult::ErrorResponse(error("Wrong email or password.")));
    }

    #[tokio::test]
    async fn test_sign_up_then_signs_in() {
        let (gateway, _) = create_gateway(ok_reply());

        let result = gateway.sign_up(&login("s3cret!")).await;

        assert!(matches!(result, LoginResult::AuthPayload(_)));
    }

    #[tokio::test]
    async fn test_sign_up_rejected_is_verbatim() {
        let gateway = Gateway::new(
            Arc::new(FakeIdentity {
                reject_sign_up: Some("The user already exists.".to_string()),
            }),
            Arc::new(FakeDictionary {
                reply: ok_reply(),
                calls: Mutex::new(Vec::new()),
            }),
            SessionStore::default(),
        );

        let result = gateway.sign_up(&login("s3cret!")).await;

        assert_eq!(result, LoginResult::ErrorResponse(error("The user already exists.")));
    }

    // ==================== Training Tests ====================

    #[tokio::test]
    async fn test_training_flow() {
        let (gateway, _) = create_gateway(ok_reply());
        let auth = gateway.authorize(Some("token-anna".to_string()));

        assert_eq!(
            gateway.start_training(&auth).await,
            TrainingSessionResult::TrainingSession(TrainingSession {
                word: "γεια".to_string(),
                completed: 0,
                total: 3,
            })
        );
        assert_eq!(
            gateway.submit_answer(&auth, "привет").await,
            TrainingSessionResult::TrainingSession(TrainingSession {
                word: "κόσμος".to_string(),
                completed: 1,
                total: 3,
            })
        );
        gateway.submit_answer(&auth, "мир").await;
        assert_eq!(
            gateway.submit_answer(&auth, "кот").await,
            TrainingSessionResult::SuccessResponse(crate::schema::types::SuccessResponse {
                message: "You are all done!".to_string()
            })
        );
        assert_eq!(
            gateway.stop_training(&auth).await,
            StandardResponse::success("Training session finished!")
        );
    }

    #[tokio::test]
    async fn test_submit_without_session() {
        let (gateway, _) = create_gateway(ok_reply());
        let auth = gateway.authorize(Some("token-anna".to_string()));

        assert_eq!(
            gateway.submit_answer(&auth, "привет").await,
            TrainingSessionResult::error("Please start the training session first!")
        );
    }

    #[tokio::test]
    async fn test_stop_without_session() {
        let (gateway, _) = create_gateway(ok_reply());
        let auth = gateway.authorize(Some("token-anna".to_string()));

        assert_eq!(
            gateway.stop_training(&auth).await,
            StandardResponse::error("You are didn't start the training yet!")
        );
    }

    #[tokio::test]
    async fn test_guarded_operations_without_user() {
        let (gateway, dictionary) = create_gateway(ok_reply());
        let input = DictionaryInput {
            word: "кот".to_string(),
            translation: "γάτα".to_string(),
        };

        for auth in [
            gateway.authorize(None),
            gateway.authorize(Some("forged".to_string())),
        ] {
            let expected = "Can't find user with given credentials";
            assert_eq!(
                gateway.start_training(&auth).await,
                TrainingSessionResult::error(expected)
            );
            assert_eq!(
                gateway.submit_answer(&auth, "привет").await,
                TrainingSessionResult::error(expected)
            );
            assert_eq!(
                gateway.stop_training(&auth).await,
                StandardResponse::error(expected)
            );
            assert_eq!(
                gateway.add_word(&auth, &input).await,
                StandardResponse::error(expected)
            );
        }

        assert!(dictionary.calls.lock().unwrap().is_empty());
        assert_eq!(gateway.sessions().active_sessions(), 0);
    }

    // ==================== add_word Tests ====================

    #[tokio::test]
    async fn test_add_word_success() {
        let (gateway, dictionary) = create_gateway(ok_reply());
        let auth = gateway.authorize(Some("token-anna".to_string()));
        let input = DictionaryInput {
            word: "собака".to_string(),
            translation: "σκύλος".to_string(),
        };

        assert_eq!(
            gateway.add_word(&auth, &input).await,
            StandardResponse::success("Word added")
        );
        assert_eq!(
            dictionary.calls.lock().unwrap().as_slice(),
            &[(
                "anna".to_string(),
                "собака".to_string(),
                "σκύλος".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_add_word_refused_by_service() {
        let (gateway, _) = create_gateway(Ok(AddWordReply {
            status_code: 409,
            message: "Word already exists".to_string(),
        }));
        let auth = gateway.authorize(Some("token-anna".to_string()));
        let input = DictionaryInput {
            word: "кот".to_string(),
            translation: "γάτα".to_string(),
        };

        assert_eq!(
            gateway.add_word(&auth, &input).await,
            StandardResponse::error("Word already exists")
        );
    }

    #[tokio::test]
    async fn test_add_word_service_down() {
        let (gateway, _) = create_gateway(Err("unavailable".to_string()));
        let auth = gateway.authorize(Some("token-anna".to_string()));
        let input = DictionaryInput {
            word: "кот".to_string(),
            translation: "γάτα".to_string(),
        };

        assert_eq!(
            gateway.add_word(&auth, &input).await,
            StandardResponse::error("Dictionary service call failed: unavailable")
        );
    }
}
