use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthManager, Credentials, HttpTokenEndpoint};
use crate::error::{ClientError, Result};
use crate::utils::{error_body, join_url};

/// Production base URL of the Bank Account Data API
pub const DEFAULT_BASE_URL: &str = "https://bankaccountdata.gocardless.com/api/v2";

/// Request timeout applied to every call, token calls included
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the Bank Account Data API
///
/// Every business call goes through [`BankDataClient::authorized`], which
/// guarantees a valid bearer token before a request is built.
pub struct BankDataClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Base address all paths are resolved against
    base_url: String,

    /// Authentication manager
    auth_manager: Arc<AuthManager>,
}

impl BankDataClient {
    /// Create a client that mints and refreshes tokens against `base_url`
    pub fn new(
        credentials: Credentials,
        base_url: impl Into<String>,
        request_timeout: u64,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let client = build_http_client(request_timeout)?;

        let endpoint = Arc::new(HttpTokenEndpoint::new(client.clone(), base_url.clone()));
        let auth_manager = Arc::new(AuthManager::new(credentials, endpoint));

        Ok(Self::with_auth_manager(client, base_url, auth_manager))
    }

    /// Create a client around an existing authentication manager
    pub fn with_auth_manager(
        client: Client,
        base_url: impl Into<String>,
        auth_manager: Arc<AuthManager>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            auth_manager,
        }
    }

    pub fn auth_manager(&self) -> &Arc<AuthManager> {
        &self.auth_manager
    }

    /// Obtain a valid token and return a request factory carrying it
    ///
    /// Fails when no token can be obtained; callers must treat the in-flight
    /// operation as failed instead of sending an unauthenticated request.
    pub async fn authorized(&self) -> Result<AuthorizedRequest<'_>> {
        let token = self.auth_manager.ensure_valid_token().await?;

        Ok(AuthorizedRequest {
            client: &self.client,
            base_url: &self.base_url,
            token,
        })
    }

    /// Execute a request and decode a successful JSON response
    ///
    /// Non-success statuses become [`ClientError::Api`] with the body kept.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        tracing::debug!(method = %method, url = %url, "Sending HTTP request");

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let err = ClientError::from(e);
                tracing::warn!(
                    error_kind = err.kind(),
                    error = %err,
                    url = %url,
                    "HTTP request error"
                );
                return Err(err);
            }
        };

        let status = response.status();
        tracing::debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            let error_text = error_body(response).await;
            tracing::error!(
                status = status.as_u16(),
                method = %method,
                url = %url,
                response_body = %error_text,
                "HTTP request failed with error response"
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Request factory holding a freshly validated bearer token
pub struct AuthorizedRequest<'a> {
    client: &'a Client,
    base_url: &'a str,
    token: String,
}

impl AuthorizedRequest<'_> {
    /// Start a request with the bearer token already attached
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, join_url(self.base_url, path))
            .bearer_auth(&self.token)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Build the shared HTTP client: fixed timeout, JSON in both directions
fn build_http_client(request_timeout: u64) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(request_timeout))
        .build()?;

    Ok(client)
}
