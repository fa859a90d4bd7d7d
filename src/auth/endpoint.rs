// Token issuance and refresh calls

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::credentials::Credentials;
use super::types::{NewTokenRequest, NewTokenResponse, RefreshTokenRequest, RefreshTokenResponse};
use crate::error::{ClientError, Result};
use crate::utils::{error_body, join_url};

/// Path of the token issuance endpoint
pub const NEW_TOKEN_PATH: &str = "/token/new/";

/// Path of the token refresh endpoint
pub const REFRESH_TOKEN_PATH: &str = "/token/refresh";

/// Network side of the token lifecycle
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Mint a new access/refresh pair from long-lived credentials
    async fn mint(&self, credentials: &Credentials) -> Result<NewTokenResponse>;

    /// Obtain a new access token from a live refresh token
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse>;
}

/// Token endpoint backed by the Bank Account Data REST API
#[derive(Clone)]
pub struct HttpTokenEndpoint {
    client: Client,
    base_url: String,
}

impl HttpTokenEndpoint {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TokenEndpoint for HttpTokenEndpoint {
    async fn mint(&self, credentials: &Credentials) -> Result<NewTokenResponse> {
        let url = join_url(&self.base_url, NEW_TOKEN_PATH);
        tracing::info!(url = %url, "Requesting new token pair...");

        let request = NewTokenRequest {
            secret_id: credentials.secret_id(),
            secret_key: credentials.secret_key(),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let data: NewTokenResponse = decode_token_response(response, "issuance").await?;

        if data.access.is_empty() || data.refresh.is_empty() {
            return Err(ClientError::RemoteAuth {
                status: 200,
                body: "token issuance response does not contain access and refresh tokens"
                    .to_string(),
            });
        }

        Ok(data)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse> {
        let url = join_url(&self.base_url, REFRESH_TOKEN_PATH);
        tracing::info!(url = %url, "Refreshing access token...");

        let request = RefreshTokenRequest {
            refresh: refresh_token,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let data: RefreshTokenResponse = decode_token_response(response, "refresh").await?;

        if data.access.is_empty() {
            return Err(ClientError::RemoteAuth {
                status: 200,
                body: "token refresh response does not contain an access token".to_string(),
            });
        }

        Ok(data)
    }
}

/// Check the status of a token endpoint response and decode its body
async fn decode_token_response<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = error_body(response).await;
        tracing::error!(
            operation = operation,
            status = status.as_u16(),
            body = %body,
            "Token request failed"
        );
        return Err(ClientError::RemoteAuth {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
