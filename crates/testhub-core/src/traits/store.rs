//! Entity store traits consumed by the tree and execution services.

use std::fmt;

use async_trait::async_trait;

use crate::result::AppResult;

/// A record owned by an entity store.
///
/// Each entity kind decides how a creation payload becomes a full record
/// (id and timestamps are assigned here) and how a partial update is merged.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identifier type.
    type Id: Clone + Eq + fmt::Display + Send + Sync + 'static;
    /// Fields supplied by the caller on creation.
    type Create: Send + 'static;
    /// Partial update payload.
    type Patch: Send + 'static;

    /// Human-readable kind used in error messages (e.g. `"Test case"`).
    const KIND: &'static str;

    /// The entity identifier.
    fn id(&self) -> &Self::Id;

    /// Build a new record, assigning a fresh id and creation timestamp.
    fn create(fields: Self::Create) -> Self;

    /// Merge a partial update, refreshing the update timestamp if the
    /// entity carries one.
    fn apply(&mut self, patch: Self::Patch);
}

/// Keyed CRUD over one entity kind.
///
/// There are no transactional guarantees across entity kinds; each call is
/// independent.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync + 'static {
    /// Return every entity in insertion order.
    async fn get_all(&self) -> AppResult<Vec<E>>;

    /// Find an entity by id.
    async fn get_by_id(&self, id: &E::Id) -> AppResult<Option<E>>;

    /// Create a new entity and return it.
    async fn create(&self, fields: E::Create) -> AppResult<E>;

    /// Merge a partial update. Fails with `NotFound` if the id is unknown.
    async fn update(&self, id: &E::Id, patch: E::Patch) -> AppResult<E>;

    /// Remove an entity and return it. Fails with `NotFound` if the id is unknown.
    async fn delete(&self, id: &E::Id) -> AppResult<E>;
}
