//! Result unions and payloads returned by every operation.

use crate::error::GatewayError;
use crate::identity::TokenSet;
use crate::training::TrainingStep;
use async_graphql::{InputObject, SimpleObject, Union};

/// Message for a session that has no words left.
pub const ALL_DONE: &str = "You are all done!";

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct SuccessResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct TrainingSession {
    pub word: String,
    pub completed: i32,
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Union)]
pub enum StandardResponse {
    SuccessResponse(SuccessResponse),
    ErrorResponse(ErrorResponse),
}

#[derive(Debug, Clone, PartialEq, Eq, Union)]
pub enum LoginResult {
    AuthPayload(AuthPayload),
    ErrorResponse(ErrorResponse),
}

#[derive(Debug, Clone, PartialEq, Eq, Union)]
#[graphql(name = "SubmitAnswerResult")]
pub enum TrainingSessionResult {
    TrainingSession(TrainingSession),
    ErrorResponse(ErrorResponse),
    SuccessResponse(SuccessResponse),
}

#[derive(Debug, Clone, InputObject)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, InputObject)]
pub struct DictionaryInput {
    pub word: String,
    pub translation: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl From<GatewayError> for ErrorResponse {
    fn from(err: GatewayError) -> Self {
        Self::new(err.public_message())
    }
}

impl StandardResponse {
    pub fn success(message: impl Into<String>) -> Self {
        StandardResponse::SuccessResponse(SuccessResponse {
            message: message.into(),
        })
    }

    pub fn error(error: impl Into<String>) -> Self {
        StandardResponse::ErrorResponse(ErrorResponse::new(error))
    }
}

impl From<GatewayError> for StandardResponse {
    fn from(err: GatewayError) -> Self {
        StandardResponse::ErrorResponse(err.into())
    }
}

impl LoginResult {
    pub fn error(error: impl Into<String>) -> Self {
        LoginResult::ErrorResponse(ErrorResponse::new(error))
    }
}

impl From<TokenSet> for LoginResult {
    fn from(tokens: TokenSet) -> Self {
        LoginResult::AuthPayload(AuthPayload {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: clamp_to_i32(tokens.expires_in),
        })
    }
}

impl From<GatewayError> for LoginResult {
    fn from(err: GatewayError) -> Self {
        LoginResult::ErrorResponse(err.into())
    }
}

impl TrainingSessionResult {
    pub fn error(error: impl Into<String>) -> Self {
        TrainingSessionResult::ErrorResponse(ErrorResponse::new(error))
    }
}

impl From<TrainingStep> for TrainingSessionResult {
    fn from(step: TrainingStep) -> Self {
        match step {
            TrainingStep::Word {
                word,
                completed,
                total,
            } => TrainingSessionResult::TrainingSession(TrainingSession {
                word: word.to_string(),
                completed: clamp_to_i32(completed.into()),
                total: clamp_to_i32(total.into()),
            }),
            TrainingStep::AllDone => TrainingSessionResult::SuccessResponse(SuccessResponse {
                message: ALL_DONE.to_string(),
            }),
        }
    }
}

impl From<GatewayError> for TrainingSessionResult {
    fn from(err: GatewayError) -> Self {
        TrainingSessionResult::ErrorResponse(err.into())
    }
}

/// GraphQL `Int` is 32-bit.
fn clamp_to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
