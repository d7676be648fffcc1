use crate::models::Marker;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A marker with this id already exists.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence for markers. Every call is a single-document operation; the
/// caller owns the future, so dropping it abandons the pending operation.
#[async_trait]
pub trait MarkerStore: Send + Sync {
    /// All markers in the store's native order.
    async fn list(&self) -> Result<Vec<Marker>, StoreError>;

    async fn insert(&self, marker: &Marker) -> Result<(), StoreError>;

    /// Returns whether a marker was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Replaces the whole document stored under `marker.id`. Never inserts;
    /// returns whether a document matched.
    async fn replace(&self, marker: &Marker) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
