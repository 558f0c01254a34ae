//! State manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use testhub_core::config::state::StateConfig;
use testhub_core::error::AppError;
use testhub_core::result::AppResult;
use testhub_core::traits::state::StateProvider;

/// State manager that wraps the configured state provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StateManager {
    /// The inner state provider.
    inner: Arc<dyn StateProvider>,
}

impl StateManager {
    /// Create a new state manager from configuration.
    pub async fn new(config: &StateConfig) -> AppResult<Self> {
        let inner: Arc<dyn StateProvider> = match config.provider.as_str() {
            #[cfg(feature = "file")]
            "file" => {
                info!(path = %config.file_path, "Initializing file-backed state provider");
                Arc::new(crate::state::FileStateProvider::open(&config.file_path).await)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory state provider");
                Arc::new(crate::state::MemoryStateProvider::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown state provider: '{other}'. Supported: memory, file"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a state manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn StateProvider>) -> Self {
        Self { inner: provider }
    }
}

#[async_trait]
impl StateProvider for StateManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testhub_core::error::ErrorKind;

    #[tokio::test]
    async fn test_unknown_provider_is_rejected() {
        let config = StateConfig {
            provider: "redis".into(),
            ..Default::default()
        };
        let err = StateManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_memory_provider_dispatch() {
        let config = StateConfig {
            provider: "memory".into(),
            ..Default::default()
        };
        let manager = StateManager::new(&config).await.unwrap();
        manager.set_json("k", &vec!["a"]).await.unwrap();
        let value: Option<Vec<String>> = manager.get_json("k").await.unwrap();
        assert_eq!(value, Some(vec!["a".to_string()]));
    }
}
