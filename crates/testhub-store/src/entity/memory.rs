//! In-memory entity store.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use testhub_core::error::AppError;
use testhub_core::result::AppResult;
use testhub_core::traits::store::{Entity, EntityStore};

/// Keyed CRUD over a vector of records.
///
/// Every call sleeps for the configured latency first, to mimic a remote
/// backend. Latency belongs to this store only; the folder tree never waits.
#[derive(Debug)]
pub struct MemoryEntityStore<E> {
    /// Records in insertion order.
    data: RwLock<Vec<E>>,
    /// Artificial delay applied to every call.
    latency: Duration,
}

impl<E: Entity> MemoryEntityStore<E> {
    /// Create a store holding the given records.
    pub fn new(records: Vec<E>) -> Self {
        Self {
            data: RwLock::new(records),
            latency: Duration::ZERO,
        }
    }

    /// Create an empty store.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Apply an artificial delay to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn not_found(id: &E::Id) -> AppError {
        AppError::not_found(format!("{} not found: {id}", E::KIND))
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryEntityStore<E> {
    async fn get_all(&self) -> AppResult<Vec<E>> {
        self.simulate_latency().await;
        Ok(self.data.read().await.clone())
    }

    async fn get_by_id(&self, id: &E::Id) -> AppResult<Option<E>> {
        self.simulate_latency().await;
        let guard = self.data.read().await;
        Ok(guard.iter().find(|e| e.id() == id).cloned())
    }

    async fn create(&self, fields: E::Create) -> AppResult<E> {
        self.simulate_latency().await;
        let entity = E::create(fields);
        self.data.write().await.push(entity.clone());
        info!(kind = E::KIND, id = %entity.id(), "Entity created");
        Ok(entity)
    }

    async fn update(&self, id: &E::Id, patch: E::Patch) -> AppResult<E> {
        self.simulate_latency().await;
        let mut guard = self.data.write().await;
        let entity = guard
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        entity.apply(patch);
        debug!(kind = E::KIND, id = %id, "Entity updated");
        Ok(entity.clone())
    }

    async fn delete(&self, id: &E::Id) -> AppResult<E> {
        self.simulate_latency().await;
        let mut guard = self.data.write().await;
        let index = guard
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        let removed = guard.remove(index);
        info!(kind = E::KIND, id = %id, "Entity deleted");
        Ok(removed)
    }
}
