//! Token Manager
//!
//! Acquires, caches and invalidates the access token used for record calls.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::core::{Clock, HttpTransport, SystemClock};
use crate::error::{AuthError, SalesforceError, SalesforceResult};
use crate::token::grant::{build_token_request, parse_token_response, validate_credentials};
use crate::token::{TokenCache, DEFAULT_CACHE_KEY};
use crate::types::{SalesforceConfig, Token};

/// Token manager interface.
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Get a valid token, exchanging credentials if the cache is empty or
    /// the cached token is expired.
    async fn get_access_token(&self) -> SalesforceResult<Token>;

    /// Discard the cached token unconditionally.
    async fn invalidate(&self);

    /// Discard the cached token only if it is still `rejected`.
    ///
    /// A token refreshed by another caller after `rejected` was handed out
    /// is left in place.
    async fn invalidate_rejected(&self, rejected: &Token);

    /// Cached token, without exchanging or checking expiry.
    async fn cached_token(&self) -> Option<Token>;
}

/// Token manager configuration.
#[derive(Debug, Clone)]
pub struct TokenManagerConfig {
    /// Safety margin subtracted from the token lifetime (default: 5 minutes).
    pub refresh_buffer: Duration,
    /// Cache slot key.
    pub cache_key: String,
}

impl Default for TokenManagerConfig {
    fn default() -> Self {
        Self {
            refresh_buffer: Duration::from_secs(300),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
        }
    }
}

/// Outcome of the latest exchange, guarded by the refresh gate.
#[derive(Default)]
struct RefreshState {
    generation: u64,
    last_failure: Option<SalesforceError>,
}

/// Default token manager implementation.
///
/// Concurrent callers that find no usable token queue on a refresh gate.
/// The first one exchanges credentials and the callers queued behind it
/// receive its outcome, token or error, without another request.
pub struct DefaultTokenManager<T: HttpTransport + ?Sized, C: TokenCache + ?Sized> {
    config: SalesforceConfig,
    manager_config: TokenManagerConfig,
    transport: Arc<T>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
    refresh_gate: tokio::sync::Mutex<RefreshState>,
    // Mirrors `RefreshState::generation`; read before queueing on the gate.
    generation: AtomicU64,
}

impl<T: HttpTransport + ?Sized, C: TokenCache + ?Sized> DefaultTokenManager<T, C> {
    /// Create new token manager.
    pub fn new(
        config: SalesforceConfig,
        manager_config: TokenManagerConfig,
        transport: Arc<T>,
        cache: Arc<C>,
    ) -> Self {
        Self::with_clock(config, manager_config, transport, cache, Arc::new(SystemClock))
    }

    /// Create new token manager with an explicit clock.
    pub fn with_clock(
        config: SalesforceConfig,
        manager_config: TokenManagerConfig,
        transport: Arc<T>,
        cache: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            manager_config,
            transport,
            cache,
            clock,
            refresh_gate: tokio::sync::Mutex::new(RefreshState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Cached token if it is still usable.
    async fn usable_cached_token(&self) -> Option<Token> {
        let token = self.cache.get(&self.manager_config.cache_key).await?;
        if token.is_expired_at(self.clock.now(), self.manager_config.refresh_buffer) {
            None
        } else {
            Some(token)
        }
    }

    /// Exchange credentials at the token endpoint.
    async fn exchange(&self) -> SalesforceResult<Token> {
        let grant = validate_credentials(&self.config)?;
        let request = build_token_request(&self.config, grant);

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            error!(status = response.status, grant = grant.as_str(), "Token request rejected");
            return Err(SalesforceError::Auth(AuthError::TokenEndpoint {
                status: response.status,
                body: response.body,
            }));
        }

        let token = parse_token_response(&response.body, self.clock.now())?;

        info!(
            instance_url = token.instance_url(),
            grant = grant.as_str(),
            expires_in = token.expires_in,
            "Obtained access token"
        );

        Ok(token)
    }
}

#[async_trait]
impl<T: HttpTransport + ?Sized, C: TokenCache + ?Sized> TokenManager
    for DefaultTokenManager<T, C>
{
    #[instrument(skip(self))]
    async fn get_access_token(&self) -> SalesforceResult<Token> {
        if let Some(token) = self.usable_cached_token().await {
            debug!("Using cached access token");
            return Ok(token);
        }

        let observed = self.generation.load(Ordering::Acquire);
        let mut state = self.refresh_gate.lock().await;

        if let Some(token) = self.usable_cached_token().await {
            debug!("Using access token refreshed by a concurrent caller");
            return Ok(token);
        }

        // An exchange completed while this caller was queued.
        if state.generation != observed {
            if let Some(error) = state.last_failure.clone() {
                debug!(error = %error, "Sharing failed exchange with queued caller");
                return Err(error);
            }
        }

        let outcome = self.exchange().await;
        match &outcome {
            Ok(token) => {
                self.cache
                    .put(&self.manager_config.cache_key, token.clone())
                    .await;
                state.last_failure = None;
            }
            Err(error) => state.last_failure = Some(error.clone()),
        }
        state.generation += 1;
        self.generation.store(state.generation, Ordering::Release);

        outcome
    }

    #[instrument(skip(self))]
    async fn invalidate(&self) {
        if self.cache.remove(&self.manager_config.cache_key).await {
            debug!("Discarded cached access token");
        }
    }

    #[instrument(skip(self, rejected))]
    async fn invalidate_rejected(&self, rejected: &Token) {
        // Refreshes hold the gate, so the slot cannot change underneath us.
        let _state = self.refresh_gate.lock().await;

        match self.cache.get(&self.manager_config.cache_key).await {
            Some(current) if current == *rejected => {
                self.cache.remove(&self.manager_config.cache_key).await;
                debug!("Discarded rejected access token");
            }
            Some(_) => debug!("Rejected access token already replaced"),
            None => {}
        }
    }

    async fn cached_token(&self) -> Option<Token> {
        self.cache.get(&self.manager_config.cache_key).await
    }
}

/// Mock token manager for testing.
#[derive(Default)]
pub struct MockTokenManager {
    token: std::sync::Mutex<Option<Token>>,
    next_error: std::sync::Mutex<Option<SalesforceError>>,
    get_count: std::sync::atomic::AtomicUsize,
    invalidate_count: std::sync::atomic::AtomicUsize,
    rejected: std::sync::Mutex<Vec<Token>>,
}

impl MockTokenManager {
    /// Create new mock token manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token returned by `get_access_token`.
    pub fn set_token(&self, token: Token) -> &Self {
        *self.token.lock().unwrap() = Some(token);
        self
    }

    /// Set next error.
    pub fn set_next_error(&self, error: SalesforceError) -> &Self {
        *self.next_error.lock().unwrap() = Some(error);
        self
    }

    /// Number of `get_access_token` calls.
    pub fn get_count(&self) -> usize {
        self.get_count.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Number of `invalidate` and `invalidate_rejected` calls.
    pub fn invalidate_count(&self) -> usize {
        self.invalidate_count
            .load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Tokens passed to `invalidate_rejected`, oldest first.
    pub fn rejected_tokens(&self) -> Vec<Token> {
        self.rejected.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenManager for MockTokenManager {
    async fn get_access_token(&self) -> SalesforceResult<Token> {
        self.get_count
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Err(error);
        }

        self.token
            .lock()
            .unwrap()
            .clone()
            .ok_or(SalesforceError::Auth(AuthError::MissingAccessToken))
    }

    async fn invalidate(&self) {
        self.invalidate_count
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    async fn invalidate_rejected(&self, rejected: &Token) {
        self.invalidate_count
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.rejected.lock().unwrap().push(rejected.clone());
    }

    async fn cached_token(&self) -> Option<Token> {
        self.token.lock().unwrap().clone()
    }
}

/// Create mock token manager for testing.
pub fn create_mock_token_manager() -> MockTokenManager {
    MockTokenManager::new()
}
