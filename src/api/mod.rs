//! HTTP transport for the assistant service.
//!
//! One request per user submission: the query text goes out as a query
//! parameter with the session credential in a bearer header, and the service
//! answers with `{"response": <payload>}` where the payload is one of the
//! shapes handled by [`crate::core::classify`]. Timeouts and connection
//! management belong to `reqwest`; callers only see success or a
//! [`TransportError`].

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Envelope the service wraps every chat answer in.
#[derive(Deserialize)]
struct ChatResponse {
    response: Value,
}

/// Request could not be completed, or the service refused it.
#[derive(Debug)]
pub enum TransportError {
    /// The request never completed, or the body could not be read.
    Request(reqwest::Error),
    /// The service answered with a non-success status.
    Status(StatusCode),
    /// The credential was rejected (401/403).
    Unauthorized,
    /// No credential was available to send.
    MissingCredential,
    /// The credential store itself could not be read.
    CredentialStore(String),
}

impl TransportError {
    /// Authorization failures are a subtype of transport failure; they are
    /// handled identically at the conversation boundary but logged apart.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            TransportError::Unauthorized
                | TransportError::MissingCredential
                | TransportError::CredentialStore(_)
        )
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(err) => write!(f, "request failed: {err}"),
            TransportError::Status(status) => write!(f, "service returned {status}"),
            TransportError::Unauthorized => write!(f, "credential rejected by the service"),
            TransportError::MissingCredential => write!(f, "no session credential available"),
            TransportError::CredentialStore(detail) => {
                write!(f, "credential store unavailable: {detail}")
            }
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Request(err) => Some(err),
            _ => None,
        }
    }
}

/// Seam between the conversation controller and the wire. Production code
/// uses [`AssistantClient`]; tests drive the controller with a stub.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_query(&self, query: &str, credential: &str) -> Result<Value, TransportError>;
}

/// `reqwest`-backed client for the assistant's chat endpoint.
pub struct AssistantClient {
    client: reqwest::Client,
    base_url: String,
}

impl AssistantClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatTransport for AssistantClient {
    async fn send_query(&self, query: &str, credential: &str) -> Result<Value, TransportError> {
        debug!(url = %self.chat_url(), "sending chat query");

        let response = self
            .client
            .post(self.chat_url())
            .query(&[("query", query)])
            .bearer_auth(credential)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TransportError::Unauthorized);
        }
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        let body: ChatResponse = response.json().await.map_err(TransportError::Request)?;
        Ok(body.response)
    }
}
