use std::fmt;

use async_trait::async_trait;
use http::StatusCode;
use thiserror::Error;

use crate::models::{Account, Instance};

/// Failures that prevent a request from producing a response at all.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid instance url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not parse response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("client session has been signed out")]
    Invalidated,
}

/// A response from the instance: the status line plus the decoded payload.
///
/// `data` is only present for successful responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub status_text: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            status: StatusCode::OK,
            status_text: StatusCode::OK.to_string(),
            data: Some(data),
        }
    }

    /// A failed response whose status text is the code and its reason phrase, e.g. "401 Unauthorized".
    pub fn failed(status: StatusCode) -> Self {
        ApiResponse {
            status,
            status_text: status.to_string(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// The payload of a 200 response, or the status text of anything else.
    pub fn into_result(self) -> Result<T, String> {
        if !self.is_success() {
            return Err(self.status_text);
        }
        self.data
            .ok_or_else(|| format!("{} (empty response body)", self.status_text))
    }
}

/// An authenticated session against one instance, on behalf of one account.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// The instance this client talks to.
    fn base_url(&self) -> &str;
    async fn get_instance(&self) -> Result<ApiResponse<Instance>, ClientError>;
    async fn verify_account_credentials(&self) -> Result<ApiResponse<Account>, ClientError>;
    /// Called on sign-out. Later requests should fail with `ClientError::Invalidated`.
    fn invalidate(&self);
    fn is_invalidated(&self) -> bool;
}

impl fmt::Debug for dyn ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url())
            .field("invalidated", &self.is_invalidated())
            .finish()
    }
}
