// Authentication types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// What the manager has to do before a token can be handed out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    /// Cached access token is still valid
    UseCached,

    /// Access token is stale but the refresh token is still live
    Refresh,

    /// No usable token material, mint a new pair from credentials
    MintNew,
}

/// Cached token material
///
/// An expiry is only meaningful while its token is non-empty. The empty
/// state carries empty tokens and Unix-epoch expiries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenState {
    pub access_token: String,
    pub access_expiry: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_expiry: DateTime<Utc>,
}

impl TokenState {
    /// State of a freshly constructed client
    pub fn empty() -> Self {
        Self {
            access_token: String::new(),
            access_expiry: DateTime::<Utc>::UNIX_EPOCH,
            refresh_token: String::new(),
            refresh_expiry: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Decide how to obtain a usable access token at `now`
    ///
    /// Presence of an access token is never trusted on its own, its expiry
    /// is always checked.
    pub fn decide(&self, now: DateTime<Utc>) -> AuthDecision {
        if !self.access_token.is_empty() && now < self.access_expiry {
            return AuthDecision::UseCached;
        }

        // A dead refresh token clears the access token as well
        if self.refresh_token.is_empty() || now >= self.refresh_expiry {
            return AuthDecision::MintNew;
        }

        if self.access_token.is_empty() {
            return AuthDecision::MintNew;
        }

        AuthDecision::Refresh
    }

    /// Build the state produced by a successful mint received at `received_at`
    pub fn from_mint(response: &NewTokenResponse, received_at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            access_token: response.access.clone(),
            access_expiry: expiry_from_ttl(received_at, response.access_expires)?,
            refresh_token: response.refresh.clone(),
            refresh_expiry: expiry_from_ttl(received_at, response.refresh_expires)?,
        })
    }

    /// Build the state produced by a successful refresh received at `received_at`
    ///
    /// Refresh token and its expiry are carried over untouched.
    pub fn with_refreshed_access(
        &self,
        response: &RefreshTokenResponse,
        received_at: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            access_token: response.access.clone(),
            access_expiry: expiry_from_ttl(received_at, response.access_expires)?,
            refresh_token: self.refresh_token.clone(),
            refresh_expiry: self.refresh_expiry,
        })
    }
}

impl Default for TokenState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Convert a server-declared TTL in seconds into an absolute expiry
///
/// Negative TTLs and expiries outside the representable date range are
/// rejected as a malformed token response.
pub fn expiry_from_ttl(received_at: DateTime<Utc>, ttl_secs: i64) -> Result<DateTime<Utc>> {
    if ttl_secs < 0 {
        return Err(ClientError::RemoteAuth {
            status: 200,
            body: format!("token response has a negative TTL: {}", ttl_secs),
        });
    }

    Duration::try_seconds(ttl_secs)
        .and_then(|ttl| received_at.checked_add_signed(ttl))
        .ok_or_else(|| ClientError::RemoteAuth {
            status: 200,
            body: format!("token response TTL out of range: {}", ttl_secs),
        })
}

/// Token issuance request body
#[derive(Serialize)]
pub struct NewTokenRequest<'a> {
    pub secret_id: &'a str,
    pub secret_key: &'a str,
}

/// Token issuance response body
#[derive(Debug, Clone, Deserialize)]
pub struct NewTokenResponse {
    pub access: String,
    pub access_expires: i64,
    pub refresh: String,
    pub refresh_expires: i64,
}

/// Token refresh request body
#[derive(Serialize)]
pub struct RefreshTokenRequest<'a> {
    pub refresh: &'a str,
}

/// Token refresh response body
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenResponse {
    pub access: String,
    pub access_expires: i64,
}
