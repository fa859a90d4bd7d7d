use std::sync::Arc;
use tokio::sync::Mutex;

use super::clock::{Clock, SystemClock};
use super::credentials::Credentials;
use super::endpoint::TokenEndpoint;
use super::types::{AuthDecision, TokenState};
use crate::error::{ClientError, Result};
use crate::utils::token_preview;

/// Authentication manager
/// Owns the token state of one client and keeps a usable access token available
///
/// The decision, the network call it triggers and the state write all happen
/// under a single lock, so concurrent callers facing a stale token cause one
/// refresh or mint, never several.
pub struct AuthManager {
    /// Long-lived secret pair, read only on mint
    credentials: Credentials,

    /// Current token material
    state: Mutex<TokenState>,

    /// Mint/refresh calls
    endpoint: Arc<dyn TokenEndpoint>,

    /// Time source for expiry checks
    clock: Arc<dyn Clock>,
}

impl AuthManager {
    /// Create a manager with empty token state and the wall clock
    pub fn new(credentials: Credentials, endpoint: Arc<dyn TokenEndpoint>) -> Self {
        Self::with_state(
            credentials,
            endpoint,
            Arc::new(SystemClock),
            TokenState::empty(),
        )
    }

    /// Create a manager with an explicit clock and starting state
    pub fn with_state(
        credentials: Credentials,
        endpoint: Arc<dyn TokenEndpoint>,
        clock: Arc<dyn Clock>,
        state: TokenState,
    ) -> Self {
        Self {
            credentials,
            state: Mutex::new(state),
            endpoint,
            clock,
        }
    }

    /// Get a valid access token, refreshing or minting if necessary
    ///
    /// On failure the token state is left exactly as it was, so the next call
    /// re-evaluates the same decision from a consistent state.
    pub async fn ensure_valid_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let next = match state.decide(now) {
            AuthDecision::UseCached => {
                tracing::debug!(expires_at = %state.access_expiry, "Using cached access token");
                return Ok(state.access_token.clone());
            }
            AuthDecision::MintNew => {
                if !state.refresh_token.is_empty() {
                    tracing::info!(
                        refresh_expired_at = %state.refresh_expiry,
                        "Refresh token expired, minting a new token pair"
                    );
                }
                self.mint().await.inspect_err(|e| {
                    tracing::error!(error = %e, kind = e.kind(), "Token issuance failed");
                })?
            }
            AuthDecision::Refresh => self.refresh(&state).await.inspect_err(|e| {
                tracing::error!(error = %e, kind = e.kind(), "Token refresh failed");
            })?,
        };

        *state = next;
        tracing::info!(
            token = %token_preview(&state.access_token),
            expires_at = %state.access_expiry.to_rfc3339(),
            "Access token updated"
        );

        Ok(state.access_token.clone())
    }

    /// Copy of the current token state
    pub async fn snapshot(&self) -> TokenState {
        self.state.lock().await.clone()
    }

    /// Mint a new token pair; all four state fields come from the response
    async fn mint(&self) -> Result<TokenState> {
        let response = self.endpoint.mint(&self.credentials).await?;
        let received_at = self.clock.now();

        TokenState::from_mint(&response, received_at)
    }

    /// Refresh the access token; refresh token and its expiry are carried over
    async fn refresh(&self, current: &TokenState) -> Result<TokenState> {
        if current.refresh_token.is_empty() {
            return Err(ClientError::InvariantViolation(
                "refresh token not set".to_string(),
            ));
        }

        let response = self.endpoint.refresh(&current.refresh_token).await?;
        let received_at = self.clock.now();

        current.with_refreshed_access(&response, received_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::{NewTokenResponse, RefreshTokenResponse};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    /// Clock pinned to a settable instant
    struct FixedClock {
        now: std::sync::Mutex<DateTime<Utc>>,
    }

    impl FixedClock {
        fn at(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self {
                now: std::sync::Mutex::new(now),
            })
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now = *now + by;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    /// Token endpoint that counts calls and can be told to fail
    struct FakeEndpoint {
        mint_calls: AtomicUsize,
        refresh_calls: AtomicUsize,
        failing: AtomicBool,
        delay: std::time::Duration,
        access_expires: i64,
        refresh_expires: i64,
    }

    impl FakeEndpoint {
        fn new() -> Arc<Self> {
            Self::with_delay(std::time::Duration::ZERO)
        }

        fn with_delay(delay: std::time::Duration) -> Arc<Self> {
            Arc::new(Self {
                mint_calls: AtomicUsize::new(0),
                refresh_calls: AtomicUsize::new(0),
                failing: AtomicBool::new(false),
                delay,
                access_expires: 3600,
                refresh_expires: 7_776_000,
            })
        }

        fn with_ttls(access_expires: i64, refresh_expires: i64) -> Arc<Self> {
            Arc::new(Self {
                mint_calls: AtomicUsize::new(0),
                refresh_calls: AtomicUsize::new(0),
                failing: AtomicBool::new(false),
                delay: std::time::Duration::ZERO,
                access_expires,
                refresh_expires,
            })
        }

        fn failing() -> Arc<Self> {
            let endpoint = Self::new();
            endpoint.failing.store(true, Ordering::SeqCst);
            endpoint
        }

        fn mints(&self) -> usize {
            self.mint_calls.load(Ordering::SeqCst)
        }

        fn refreshes(&self) -> usize {
            self.refresh_calls.load(Ordering::SeqCst)
        }

        fn rejection(&self) -> Option<ClientError> {
            self.failing
                .load(Ordering::SeqCst)
                .then(|| ClientError::RemoteAuth {
                    status: 401,
                    body: r#"{"summary":"Authentication failed"}"#.to_string(),
                })
        }
    }

    #[async_trait]
    impl TokenEndpoint for FakeEndpoint {
        async fn mint(&self, credentials: &Credentials) -> Result<NewTokenResponse> {
            let n = self.mint_calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(self.delay).await;
            if let Some(err) = self.rejection() {
                return Err(err);
            }
            assert_eq!(credentials.secret_id(), "test-secret-id");
            Ok(NewTokenResponse {
                access: format!("minted-access-{}", n),
                access_expires: self.access_expires,
                refresh: format!("minted-refresh-{}", n),
                refresh_expires: self.refresh_expires,
            })
        }

        async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse> {
            let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(self.delay).await;
            if let Some(err) = self.rejection() {
                return Err(err);
            }
            Ok(RefreshTokenResponse {
                access: format!("refreshed-access-{}-from-{}", n, refresh_token),
                access_expires: self.access_expires,
            })
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 24, 12, 0, 0).unwrap()
    }

    fn credentials() -> Credentials {
        Credentials::new("test-secret-id", "test-secret-key").unwrap()
    }

    /// Access token expired a minute ago, refresh token good for a day
    fn stale_access_state() -> TokenState {
        TokenState {
            access_token: "old-access".to_string(),
            access_expiry: t0() - Duration::seconds(60),
            refresh_token: "live-refresh".to_string(),
            refresh_expiry: t0() + Duration::days(1),
        }
    }

    fn manager(endpoint: Arc<FakeEndpoint>, clock: Arc<FixedClock>, state: TokenState) -> AuthManager {
        AuthManager::with_state(credentials(), endpoint, clock, state)
    }

    #[tokio::test]
    async fn test_valid_token_makes_no_network_calls() {
        let endpoint = FakeEndpoint::new();
        let state = TokenState {
            access_token: "cached".to_string(),
            access_expiry: t0() + Duration::minutes(30),
            refresh_token: "refresh".to_string(),
            refresh_expiry: t0() + Duration::days(30),
        };
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), state.clone());

        let token = assert_ok!(manager.ensure_valid_token().await);

        assert_eq!(token, "cached");
        assert_eq!(endpoint.mints(), 0);
        assert_eq!(endpoint.refreshes(), 0);
        assert_eq!(manager.snapshot().await, state);
    }

    #[tokio::test]
    async fn test_empty_state_mints_and_populates_all_fields() {
        let endpoint = FakeEndpoint::new();
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), TokenState::empty());

        let token = assert_ok!(manager.ensure_valid_token().await);

        assert_eq!(token, "minted-access-1");
        assert_eq!(endpoint.mints(), 1);
        assert_eq!(endpoint.refreshes(), 0);

        let state = manager.snapshot().await;
        assert_eq!(state.access_token, "minted-access-1");
        assert_eq!(state.refresh_token, "minted-refresh-1");
    }

    #[tokio::test]
    async fn test_mint_expiry_is_receipt_time_plus_ttl() {
        let endpoint = FakeEndpoint::new();
        let manager = manager(endpoint, FixedClock::at(t0()), TokenState::empty());

        assert_ok!(manager.ensure_valid_token().await);

        let state = manager.snapshot().await;
        assert_eq!(state.access_expiry, t0() + Duration::seconds(3600));
        assert_eq!(state.refresh_expiry, t0() + Duration::seconds(7_776_000));
    }

    #[tokio::test]
    async fn test_stale_access_token_refreshes_access_fields_only() {
        let endpoint = FakeEndpoint::new();
        let before = stale_access_state();
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), before.clone());

        let token = assert_ok!(manager.ensure_valid_token().await);

        assert_eq!(token, "refreshed-access-1-from-live-refresh");
        assert_eq!(endpoint.refreshes(), 1);
        assert_eq!(endpoint.mints(), 0);

        let after = manager.snapshot().await;
        assert_eq!(after.access_token, token);
        assert_eq!(after.access_expiry, t0() + Duration::seconds(3600));
        assert_eq!(after.refresh_token, before.refresh_token);
        assert_eq!(after.refresh_expiry, before.refresh_expiry);
    }

    #[tokio::test]
    async fn test_access_expiry_boundary_is_stale() {
        let endpoint = FakeEndpoint::new();
        let mut state = stale_access_state();
        state.access_expiry = t0();
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), state);

        assert_ok!(manager.ensure_valid_token().await);

        assert_eq!(endpoint.refreshes(), 1);
    }

    #[tokio::test]
    async fn test_expired_refresh_token_mints_instead_of_refreshing() {
        let endpoint = FakeEndpoint::new();
        let before = TokenState {
            access_token: "old-access".to_string(),
            access_expiry: t0() - Duration::days(2),
            refresh_token: "dead-refresh".to_string(),
            refresh_expiry: t0() - Duration::days(1),
        };
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), before.clone());

        let token = assert_ok!(manager.ensure_valid_token().await);

        assert_eq!(token, "minted-access-1");
        assert_eq!(endpoint.mints(), 1);
        assert_eq!(endpoint.refreshes(), 0);

        let after = manager.snapshot().await;
        assert_ne!(after.access_token, before.access_token);
        assert_ne!(after.access_expiry, before.access_expiry);
        assert_ne!(after.refresh_token, before.refresh_token);
        assert_ne!(after.refresh_expiry, before.refresh_expiry);
    }

    #[tokio::test]
    async fn test_refresh_expiry_boundary_mints() {
        let endpoint = FakeEndpoint::new();
        let mut state = stale_access_state();
        state.refresh_expiry = t0();
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), state);

        assert_ok!(manager.ensure_valid_token().await);

        assert_eq!(endpoint.mints(), 1);
        assert_eq!(endpoint.refreshes(), 0);
    }

    #[tokio::test]
    async fn test_non_empty_but_expired_token_is_not_trusted() {
        // Both tokens present, both dead: presence alone must not short-circuit the mint
        let endpoint = FakeEndpoint::new();
        let state = TokenState {
            access_token: "present-but-dead".to_string(),
            access_expiry: t0() - Duration::seconds(1),
            refresh_token: "also-dead".to_string(),
            refresh_expiry: t0() - Duration::seconds(1),
        };
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), state);

        let token = assert_ok!(manager.ensure_valid_token().await);

        assert_eq!(token, "minted-access-1");
    }

    #[tokio::test]
    async fn test_failed_mint_leaves_state_unchanged() {
        let endpoint = FakeEndpoint::failing();
        let before = TokenState {
            access_token: "old-access".to_string(),
            access_expiry: t0() - Duration::days(2),
            refresh_token: "dead-refresh".to_string(),
            refresh_expiry: t0() - Duration::days(1),
        };
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), before.clone());

        let err = assert_err!(manager.ensure_valid_token().await);

        assert!(matches!(err, ClientError::RemoteAuth { status: 401, .. }));
        assert_eq!(endpoint.mints(), 1);
        assert_eq!(manager.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_state_unchanged() {
        let endpoint = FakeEndpoint::failing();
        let before = stale_access_state();
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), before.clone());

        let err = assert_err!(manager.ensure_valid_token().await);

        assert_eq!(err.status(), Some(401));
        assert_eq!(endpoint.refreshes(), 1);
        assert_eq!(manager.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_unrepresentable_mint_ttl_is_rejected_without_state_change() {
        let endpoint = FakeEndpoint::with_ttls(i64::MAX, 7_776_000);
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), TokenState::empty());

        let err = assert_err!(manager.ensure_valid_token().await);

        assert!(matches!(err, ClientError::RemoteAuth { .. }));
        assert_eq!(endpoint.mints(), 1);
        assert_eq!(manager.snapshot().await, TokenState::empty());
    }

    #[tokio::test]
    async fn test_negative_refresh_ttl_is_rejected_without_state_change() {
        let endpoint = FakeEndpoint::with_ttls(-1, 7_776_000);
        let before = stale_access_state();
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), before.clone());

        let err = assert_err!(manager.ensure_valid_token().await);

        assert!(err.to_string().contains("negative TTL"));
        assert_eq!(endpoint.refreshes(), 1);
        assert_eq!(manager.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_retry_after_failure_repeats_same_decision() {
        let endpoint = FakeEndpoint::failing();
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), stale_access_state());

        assert_err!(manager.ensure_valid_token().await);
        endpoint.failing.store(false, Ordering::SeqCst);
        let token = assert_ok!(manager.ensure_valid_token().await);

        // Second attempt refreshed again rather than minting
        assert_eq!(token, "refreshed-access-2-from-live-refresh");
        assert_eq!(endpoint.refreshes(), 2);
        assert_eq!(endpoint.mints(), 0);
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_is_invariant_violation() {
        let endpoint = FakeEndpoint::new();
        let mut state = stale_access_state();
        state.refresh_token.clear();
        let manager = manager(endpoint.clone(), FixedClock::at(t0()), state.clone());

        let err = assert_err!(manager.refresh(&state).await);

        assert!(matches!(err, ClientError::InvariantViolation(_)));
        assert_eq!(endpoint.refreshes(), 0);
    }

    #[tokio::test]
    async fn test_token_lifecycle_over_time() {
        let endpoint = FakeEndpoint::new();
        let clock = FixedClock::at(t0());
        let manager = manager(endpoint.clone(), clock.clone(), TokenState::empty());

        assert_eq!(assert_ok!(manager.ensure_valid_token().await), "minted-access-1");

        clock.advance(Duration::minutes(30));
        assert_eq!(assert_ok!(manager.ensure_valid_token().await), "minted-access-1");

        clock.advance(Duration::minutes(31));
        assert_eq!(
            assert_ok!(manager.ensure_valid_token().await),
            "refreshed-access-1-from-minted-refresh-1"
        );

        clock.advance(Duration::days(91));
        assert_eq!(assert_ok!(manager.ensure_valid_token().await), "minted-access-2");

        assert_eq!(endpoint.mints(), 2);
        assert_eq!(endpoint.refreshes(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_refresh() {
        let endpoint = FakeEndpoint::with_delay(std::time::Duration::from_millis(50));
        let manager = Arc::new(manager(
            endpoint.clone(),
            FixedClock::at(t0()),
            stale_access_state(),
        ));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.ensure_valid_token().await })
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            let token = result.unwrap().unwrap();
            assert_eq!(token, "refreshed-access-1-from-live-refresh");
        }

        assert_eq!(endpoint.refreshes(), 1);
        assert_eq!(endpoint.mints(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_mint() {
        let endpoint = FakeEndpoint::with_delay(std::time::Duration::from_millis(50));
        let manager = Arc::new(manager(
            endpoint.clone(),
            FixedClock::at(t0()),
            TokenState::empty(),
        ));

        let results = futures::future::join_all((0..8).map(|_| {
            let manager = manager.clone();
            async move { manager.ensure_valid_token().await }
        }))
        .await;

        assert!(results.iter().all(|r| r.as_deref().ok() == Some("minted-access-1")));
        assert_eq!(endpoint.mints(), 1);
    }

    proptest! {
        #[test]
        fn prop_mint_expiry_matches_ttl(access_ttl in 1i64..31_536_000, refresh_ttl in 1i64..315_360_000) {
            let endpoint = FakeEndpoint::with_ttls(access_ttl, refresh_ttl);
            let manager = manager(endpoint, FixedClock::at(t0()), TokenState::empty());

            let state = tokio_test::block_on(async {
                manager.ensure_valid_token().await.unwrap();
                manager.snapshot().await
            });

            prop_assert_eq!(state.access_expiry, t0() + Duration::seconds(access_ttl));
            prop_assert_eq!(state.refresh_expiry, t0() + Duration::seconds(refresh_ttl));
        }
    }
}
