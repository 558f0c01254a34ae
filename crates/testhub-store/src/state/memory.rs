//! In-memory state provider using the moka crate.

use async_trait::async_trait;
use moka::future::Cache;

use testhub_core::config::state::MemoryStateConfig;
use testhub_core::result::AppResult;
use testhub_core::traits::state::StateProvider;

/// In-memory state provider using moka. Contents vanish with the process.
#[derive(Debug, Clone)]
pub struct MemoryStateProvider {
    /// The underlying moka cache.
    cache: Cache<String, String>,
}

impl MemoryStateProvider {
    /// Create a new in-memory provider from configuration.
    pub fn new(config: &MemoryStateConfig) -> Self {
        let cache = Cache::builder().max_capacity(config.max_capacity).build();
        Self { cache }
    }
}

impl Default for MemoryStateProvider {
    fn default() -> Self {
        Self::new(&MemoryStateConfig::default())
    }
}

#[async_trait]
impl StateProvider for MemoryStateProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
