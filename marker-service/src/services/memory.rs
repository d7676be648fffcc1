use crate::models::Marker;
use crate::services::store::{MarkerStore, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local store keeping markers in insertion order. Mirrors the
/// MongoDB semantics: unique ids, replace never inserts, deleting a missing id
/// is not an error.
#[derive(Clone, Default)]
pub struct InMemoryMarkerStore {
    markers: Arc<RwLock<Vec<Marker>>>,
}

impl InMemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.markers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.markers.read().await.is_empty()
    }
}

#[async_trait]
impl MarkerStore for InMemoryMarkerStore {
    async fn list(&self) -> Result<Vec<Marker>, StoreError> {
        Ok(self.markers.read().await.clone())
    }

    async fn insert(&self, marker: &Marker) -> Result<(), StoreError> {
        let mut markers = self.markers.write().await;
        if markers.iter().any(|m| m.id == marker.id) {
            return Err(StoreError::DuplicateKey(marker.id.clone()));
        }
        markers.push(marker.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut markers = self.markers.write().await;
        let before = markers.len();
        markers.retain(|m| m.id != id);
        Ok(markers.len() != before)
    }

    async fn replace(&self, marker: &Marker) -> Result<bool, StoreError> {
        let mut markers = self.markers.write().await;
        match markers.iter_mut().find(|m| m.id == marker.id) {
            Some(existing) => {
                *existing = marker.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coords, Image};

    fn marker(id: &str, name: &str) -> Marker {
        Marker {
            id: id.to_string(),
            name: name.to_string(),
            location: Coords {
                latitude: 10.0,
                longitude: 20.0,
            },
            images: vec![],
        }
    }

    #[tokio::test]
    async fn lists_in_insertion_order() {
        let store = InMemoryMarkerStore::new();
        assert!(store.list().await.unwrap().is_empty());

        store.insert(&marker("b", "second")).await.unwrap();
        store.insert(&marker("a", "first")).await.unwrap();

        let ids: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let store = InMemoryMarkerStore::new();
        store.insert(&marker("a", "first")).await.unwrap();

        let err = store.insert(&marker("a", "again")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(id) if id == "a"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn replace_swaps_whole_document_and_never_inserts() {
        let store = InMemoryMarkerStore::new();
        let mut original = marker("a", "first");
        original.images.push(Image {
            id: "old".to_string(),
            uri: "u".to_string(),
            width: 1,
            height: 1,
        });
        store.insert(&original).await.unwrap();

        let replacement = marker("a", "renamed");
        assert!(store.replace(&replacement).await.unwrap());
        assert_eq!(store.list().await.unwrap(), vec![replacement]);

        assert!(!store.replace(&marker("ghost", "nobody")).await.unwrap());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_matched() {
        let store = InMemoryMarkerStore::new();
        store.insert(&marker("a", "first")).await.unwrap();

        assert!(!store.delete("missing").await.unwrap());
        assert!(store.delete("a").await.unwrap());
        assert!(store.is_empty().await);
    }
}
