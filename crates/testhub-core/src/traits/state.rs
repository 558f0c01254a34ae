//! Small persistent key-value state, such as which folders are expanded.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::result::AppResult;

/// A string-keyed store of string values that survives between sessions.
///
/// Writes are best effort: callers log a failed write and carry on with
/// their in-memory copy.
#[async_trait]
pub trait StateProvider: Send + Sync + std::fmt::Debug + 'static {
    /// `Ok(None)` when the key was never written or has been deleted.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Reads `key` and decodes it as JSON. A value that does not decode is a
    /// `Serialization` error, not `None`.
    async fn get_json<T>(&self, key: &str) -> AppResult<Option<T>>
    where
        Self: Sized,
        T: DeserializeOwned + Send,
    {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Encodes `value` as JSON under `key`.
    async fn set_json<T>(&self, key: &str, value: &T) -> AppResult<()>
    where
        Self: Sized,
        T: Serialize + Send + Sync,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw).await
    }

    /// `Ok(false)` when the backend cannot currently be written.
    async fn health_check(&self) -> AppResult<bool>;
}
