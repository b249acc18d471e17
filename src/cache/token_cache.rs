use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::token::CachedToken;

/// Key-value store with expiry used for the access token.
///
/// A miss and an expired entry are indistinguishable to callers. `put` overwrites unconditionally.
#[async_trait]
pub trait TokenCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn put(&self, key: &str, value: &str, ttl: Duration);

    async fn forget(&self, key: &str);
}

/// Process-memory store: key -> token
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenCache {
    inner: Arc<RwLock<HashMap<String, CachedToken>>>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<dyn TokenCache> {
        Arc::new(Self::new())
    }

    /// Raw entry including its expiry, expired or not.
    pub async fn entry(&self, key: &str) -> Option<CachedToken> {
        self.inner.read().await.get(key).cloned()
    }
}

#[async_trait]
impl TokenCache for MemoryTokenCache {
    async fn get(&self, key: &str) -> Option<String> {
        {
            let map = self.inner.read().await;
            match map.get(key) {
                None => return None,
                Some(token) if !token.is_expired() => return Some(token.value.to_owned()),
                Some(_) => {}
            }
        }
        // expired: evict, unless someone stored a fresh one meanwhile
        let mut map = self.inner.write().await;
        if map.get(key).is_some_and(CachedToken::is_expired) {
            debug!("evicting expired token for key '{}'", key);
            map.remove(key);
        }
        None
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) {
        let mut map = self.inner.write().await;
        map.insert(key.to_owned(), CachedToken::new(value.to_owned(), ttl));
    }

    async fn forget(&self, key: &str) {
        self.inner.write().await.remove(key);
    }
}
