//! gRPC client for the dictionary service.
//!
//! One channel is opened per call and dropped afterwards. The service owns
//! persistence; this side only forwards `AddWord` and reports the status
//! code and message it gets back.

use crate::config::Config;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Endpoint;
use tracing::{debug, info};

/// Wire messages of `DictionaryService`.
pub mod proto {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct AddWordRequest {
        #[prost(string, tag = "1")]
        pub user_id: String,
        #[prost(string, tag = "2")]
        pub word: String,
        #[prost(string, tag = "3")]
        pub translation: String,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct AddWordResponse {
        #[prost(int32, tag = "1")]
        pub status_code: i32,
        #[prost(string, tag = "2")]
        pub message: String,
    }
}

/// Fully qualified `AddWord` method path.
pub const ADD_WORD_PATH: &str = "/dictionary.DictionaryService/AddWord";

/// Status code the service uses for a stored word.
pub const STATUS_OK: i32 = 200;

/// Outcome reported by the dictionary service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddWordReply {
    pub status_code: i32,
    pub message: String,
}

impl AddWordReply {
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Failed to connect to dictionary service: {0}")]
    Connect(#[from] tonic::transport::Error),

    #[error("Dictionary service call failed: {0}")]
    Rpc(String),
}

#[async_trait]
pub trait DictionaryClient: Send + Sync {
    async fn add_word(
        &self,
        user_id: &str,
        word: &str,
        translation: &str,
    ) -> Result<AddWordReply, DictionaryError>;
}

/// Dictionary client that dials the service for every call.
#[derive(Debug, Clone)]
pub struct GrpcDictionaryClient {
    uri: String,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl GrpcDictionaryClient {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.dictionary_uri())
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

#[async_trait]
impl DictionaryClient for GrpcDictionaryClient {
    async fn add_word(
        &self,
        user_id: &str,
        word: &str,
        translation: &str,
    ) -> Result<AddWordReply, DictionaryError> {
        let channel = Endpoint::from_shared(self.uri.clone())?
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .connect()
            .await?;
        debug!("Connected to dictionary service at {}", self.uri);

        let mut grpc = tonic::client::Grpc::new(channel);
        grpc.ready()
            .await
            .map_err(|e| DictionaryError::Rpc(format!("Service was not ready: {}", e)))?;

        let request = tonic::Request::new(proto::AddWordRequest {
            user_id: user_id.to_string(),
            word: word.to_string(),
            translation: translation.to_string(),
        });
        let codec: tonic_prost::ProstCodec<proto::AddWordRequest, proto::AddWordResponse> =
            tonic_prost::ProstCodec::default();

        let response = grpc
            .unary(request, PathAndQuery::from_static(ADD_WORD_PATH), codec)
            .await
            .map_err(|status| DictionaryError::Rpc(status.message().to_string()))?
            .into_inner();

        info!(
            "Dictionary service answered AddWord with status {}",
            response.status_code
        );

        Ok(AddWordReply {
            status_code: response.status_code,
            message: response.message,
        })
    }
}
