//! Document store access.
//!
//! The CRM only needs five operations from its backing store: create, get,
//! partial update, delete and a full collection listing ordered by one field.
//! [`DocumentStore`] captures exactly that, so the customer repository never
//! sees a wire format.
//!
//! # Backends
//!
//! - [`FirestoreStore`] - Cloud Firestore REST API (or its emulator)
//! - [`MemoryStore`] - process-local store for tests and demos
//!
//! Neither backend retries. A failed call is reported once and retrying is
//! left to the caller.

mod document;
mod error;
pub mod firestore;
mod memory;

use async_trait::async_trait;

pub use document::{Document, FieldUpdate, FieldUpdates, FieldValue, Fields, SortDirection};
pub use error::StoreError;
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// The semantic operations a hosted document database provides.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document and return its generated id.
    async fn create_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Fetch a document. A missing document is `Ok(None)`.
    async fn get_document(&self, collection: &str, id: &str)
    -> Result<Option<Document>, StoreError>;

    /// Merge `updates` into an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] if the document does not exist.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        updates: FieldUpdates,
    ) -> Result<(), StoreError>;

    /// Remove a document. Removing a missing document succeeds.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Every document in `collection` that has `order_by`, sorted on it.
    async fn list_documents(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError>;
}
