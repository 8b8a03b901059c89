//! Integration tests for the salon CRM client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p salon-crm-integration-tests
//! ```
//!
//! Everything here runs against [`MemoryStore`], so no database or network
//! is needed. The helpers build a repository over a shared store and offer a
//! store wrapper whose deletes always fail.
//!
//! # Test Categories
//!
//! - `customers` - repository round trips and partial updates
//! - `customer_list` - list view-model filtering and local mutations
//! - `customer_form` - form validation and submission

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use salon_crm_admin::clock::{Clock, SteppingClock, SystemClock};
use salon_crm_admin::db::CustomerRepository;
use salon_crm_admin::store::{
    Document, DocumentStore, FieldUpdates, Fields, MemoryStore, SortDirection, StoreError,
};
use salon_crm_core::{NewCustomer, Plan, Status};

/// A repository over a fresh in-memory store with the system clock.
#[must_use]
pub fn memory_repo() -> CustomerRepository {
    CustomerRepository::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock::new()))
}

/// A repository whose clock advances one second per reading, starting at
/// 2024-01-01 00:00:00 UTC.
#[must_use]
pub fn stepping_repo(store: Arc<dyn DocumentStore>) -> CustomerRepository {
    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default();
    let clock: Arc<dyn Clock> = Arc::new(SteppingClock::starting_at(start));
    CustomerRepository::new(store, clock)
}

/// 田中花子 on the premium plan with every optional field filled.
#[must_use]
pub fn hanako() -> NewCustomer {
    NewCustomer {
        email: "hanako@example.com".parse().ok(),
        phone: Some("090-1234-5678".to_string()),
        contract_date: Some("2024-01-15".to_string()),
        makeup_count: 3,
        hair_count: 2,
        fashion_count: 1,
        next_date: Some("2024-02-15".to_string()),
        next_content: Some("メイクレッスン".to_string()),
        ..NewCustomer::new("田中花子", Plan::Premium, Status::FirstCounselingDone)
    }
}

/// 佐藤美咲 on the standard plan.
#[must_use]
pub fn misaki() -> NewCustomer {
    NewCustomer {
        email: "misaki@example.com".parse().ok(),
        phone: Some("080-2345-6789".to_string()),
        makeup_count: 1,
        ..NewCustomer::new("佐藤美咲", Plan::Standard, Status::PreLearningCompleted)
    }
}

/// A store that behaves like [`MemoryStore`] except that every delete
/// reports the backend as unavailable.
#[derive(Debug, Default)]
pub struct FailingDeletes {
    inner: MemoryStore,
}

impl FailingDeletes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for FailingDeletes {
    async fn create_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        self.inner.create_document(collection, fields).await
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.inner.get_document(collection, id).await
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        updates: FieldUpdates,
    ) -> Result<(), StoreError> {
        self.inner.update_document(collection, id, updates).await
    }

    async fn delete_document(&self, _collection: &str, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn list_documents(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner
            .list_documents(collection, order_by, direction)
            .await
    }
}
