//! Token Cache
//!
//! Injected single-slot token cache shared by every caller of a token manager.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::types::Token;

/// Cache key used for the process-wide connection.
pub const DEFAULT_CACHE_KEY: &str = "default";

/// Token cache interface.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Token stored under `key`, if any. Expiry is not checked here.
    async fn get(&self, key: &str) -> Option<Token>;

    /// Store a token under `key`, replacing whatever the slot held.
    async fn put(&self, key: &str, token: Token);

    /// Discard the token stored under `key`. Returns whether one was present.
    async fn remove(&self, key: &str) -> bool;
}

/// In-memory token cache holding a single entry.
///
/// Storing under a new key evicts the previous entry.
#[derive(Default)]
pub struct InMemoryTokenCache {
    slot: RwLock<Option<(String, Token)>>,
}

impl InMemoryTokenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn get(&self, key: &str) -> Option<Token> {
        match &*self.slot.read().await {
            Some((k, token)) if k == key => Some(token.clone()),
            _ => None,
        }
    }

    async fn put(&self, key: &str, token: Token) {
        *self.slot.write().await = Some((key.to_string(), token));
    }

    async fn remove(&self, key: &str) -> bool {
        let mut slot = self.slot.write().await;
        match &*slot {
            Some((k, _)) if k == key => {
                *slot = None;
                true
            }
            _ => false,
        }
    }
}
