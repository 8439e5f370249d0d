use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{ApiClient, ApiResponse, ClientError};
use crate::config::ClientConfig;
use crate::models::{Account, Instance, StoredCredential};

const INSTANCE_PATH: &str = "api/v1/instance";
const VERIFY_CREDENTIALS_PATH: &str = "api/v1/accounts/verify_credentials";

/// `ApiClient` over the Mastodon-compatible REST API, authenticated with a bearer token.
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: String,
    invalidated: AtomicBool,
}

impl HttpApiClient {
    pub fn new(credential: &StoredCredential, config: &ClientConfig) -> Result<Self, ClientError> {
        let mut base_url =
            Url::parse(&credential.instance_url).map_err(|source| ClientError::InvalidUrl {
                url: credential.instance_url.clone(),
                source,
            })?;
        // Url::join replaces the last segment unless the base ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(ms) = config.timeout_in_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        Ok(HttpApiClient {
            http: builder.build()?,
            base_url,
            access_token: credential.access_token.clone(),
            invalidated: AtomicBool::new(false),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ClientError> {
        if self.is_invalidated() {
            return Err(ClientError::Invalidated);
        }
        let url = self
            .base_url
            .join(path)
            .map_err(|source| ClientError::InvalidUrl {
                url: path.to_string(),
                source,
            })?;

        debug!("Sending GET request to: {}", url);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!("Instance answered {} for {}", status, path);
            return Ok(ApiResponse::failed(status));
        }

        let body = response.text().await?;
        let data = serde_json::from_str(&body)?;
        Ok(ApiResponse {
            status,
            status_text: status.to_string(),
            data: Some(data),
        })
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    async fn get_instance(&self) -> Result<ApiResponse<Instance>, ClientError> {
        self.get(INSTANCE_PATH).await
    }

    async fn verify_account_credentials(&self) -> Result<ApiResponse<Account>, ClientError> {
        self.get(VERIFY_CREDENTIALS_PATH).await
    }

    fn invalidate(&self) {
        self.invalidated.store(true, Ordering::SeqCst);
    }

    fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::SeqCst)
    }
}
