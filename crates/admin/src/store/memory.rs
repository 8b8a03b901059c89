//! In-process document store.
//!
//! Behaves like the hosted store for the five operations the CRM uses:
//! generated 20-character ids, merge updates that fail on missing documents,
//! idempotent deletes, and ordered listings that skip documents lacking the
//! sort field. Documents with equal sort keys keep insertion order.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{Document, DocumentStore, FieldUpdate, FieldUpdates, Fields, SortDirection, StoreError};

/// Length of generated document ids.
const ID_LENGTH: usize = 20;

/// A document store held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Whether a collection holds no documents.
    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }

    fn generate_id(existing: &[Document]) -> String {
        let mut rng = rand::rng();
        loop {
            let id: String = (&mut rng)
                .sample_iter(Alphanumeric)
                .take(ID_LENGTH)
                .map(char::from)
                .collect();
            if !existing.iter().any(|doc| doc.id == id) {
                return id;
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    #[instrument(skip(self, fields))]
    async fn create_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_owned()).or_default();
        let id = Self::generate_id(docs);
        let now = Utc::now();

        docs.push(Document {
            id: id.clone(),
            fields,
            create_time: Some(now),
            update_time: Some(now),
        });

        debug!(id = %id, "Document created");
        Ok(id)
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    #[instrument(skip(self, updates))]
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        updates: FieldUpdates,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;

        for (field, update) in updates {
            match update {
                FieldUpdate::Set(value) => {
                    doc.fields.insert(field, value);
                }
                FieldUpdate::Delete => {
                    doc.fields.remove(&field);
                }
            }
        }
        doc.update_time = Some(Utc::now());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|doc| doc.id != id);
        }
        Ok(())
    }

    async fn list_documents(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.fields.contains_key(order_by))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        docs.sort_by(|a, b| {
            let ordering = match (a.fields.get(order_by), b.fields.get(order_by)) {
                (Some(x), Some(y)) => x.order(y),
                _ => std::cmp::Ordering::Equal,
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        Ok(docs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::store::FieldValue;

    fn fields(pairs: &[(&str, FieldValue)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_create_generates_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.create_document("customers", Fields::new()).await.unwrap();
        let b = store.create_document("customers", Fields::new()).await.unwrap();

        assert_eq!(a.len(), ID_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
        assert_eq!(store.len("customers").await, 2);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get_document("customers", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_and_deletes_fields() {
        let store = MemoryStore::new();
        let id = store
            .create_document(
                "customers",
                fields(&[("name", "田中花子".into()), ("phone", "090".into())]),
            )
            .await
            .unwrap();

        let mut updates = FieldUpdates::new();
        updates.insert("hairCount".to_string(), FieldUpdate::Set(FieldValue::Integer(2)));
        updates.insert("phone".to_string(), FieldUpdate::Delete);
        store.update_document("customers", &id, updates).await.unwrap();

        let doc = store.get_document("customers", &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["name"], FieldValue::from("田中花子"));
        assert_eq!(doc.fields["hairCount"], FieldValue::Integer(2));
        assert!(!doc.fields.contains_key("phone"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_document("customers", "ghost", FieldUpdates::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.create_document("customers", Fields::new()).await.unwrap();
        store.delete_document("customers", &id).await.unwrap();
        store.delete_document("customers", &id).await.unwrap();
        store.delete_document("never-created", "x").await.unwrap();
        assert!(store.is_empty("customers").await);
    }

    #[tokio::test]
    async fn test_list_orders_and_skips_unsortable() {
        let store = MemoryStore::new();
        for (name, rank) in [("b", 2), ("a", 1), ("c", 3)] {
            store
                .create_document(
                    "customers",
                    fields(&[("name", name.into()), ("rank", FieldValue::Integer(rank))]),
                )
                .await
                .unwrap();
        }
        store
            .create_document("customers", fields(&[("name", "no-rank".into())]))
            .await
            .unwrap();

        let names = |docs: Vec<Document>| -> Vec<FieldValue> {
            docs.into_iter().map(|d| d.fields["name"].clone()).collect()
        };

        let desc = store
            .list_documents("customers", "rank", SortDirection::Descending)
            .await
            .unwrap();
        assert_eq!(names(desc), vec!["c".into(), "b".into(), "a".into()]);

        let asc = store
            .list_documents("customers", "rank", SortDirection::Ascending)
            .await
            .unwrap();
        assert_eq!(names(asc), vec!["a".into(), "b".into(), "c".into()]);
    }
}
