//! Customer list screen state.
//!
//! Holds the last fetched customer list and the three filter terms. The
//! visible list is always computed from those two, never stored.

use tracing::{info, instrument};

use salon_crm_core::{
    Customer, CustomerFilter, CustomerId, PaginatedResponse, PaginationParams, Plan, Status,
    filter_customers,
};

use crate::db::CustomerRepository;
use crate::error::AppError;

/// View-model for the customer list.
#[derive(Debug)]
pub struct CustomerListView {
    repo: CustomerRepository,
    /// `None` until the first successful refresh.
    cache: Option<Vec<Customer>>,
    filter: CustomerFilter,
}

impl CustomerListView {
    #[must_use]
    pub fn new(repo: CustomerRepository) -> Self {
        Self {
            repo,
            cache: None,
            filter: CustomerFilter::new(),
        }
    }

    /// Fetch the full list from the store.
    ///
    /// # Errors
    ///
    /// Returns the repository failure. The cached list is left as it was.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<&[Customer], AppError> {
        let customers = self.repo.list().await?;
        info!(count = customers.len(), "Customer list refreshed");
        Ok(self.cache.insert(customers).as_slice())
    }

    /// Drop the cached list so the next read must refresh.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// The cached list, unfiltered.
    #[must_use]
    pub fn customers(&self) -> Option<&[Customer]> {
        self.cache.as_deref()
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.cache.is_some()
    }

    #[must_use]
    pub const fn filter(&self) -> &CustomerFilter {
        &self.filter
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.set_search(term);
    }

    pub const fn set_plan(&mut self, plan: Option<Plan>) {
        self.filter.set_plan(plan);
    }

    pub const fn set_status(&mut self, status: Option<Status>) {
        self.filter.set_status(status);
    }

    /// Reset search, plan and status together.
    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    #[must_use]
    pub const fn has_active_filters(&self) -> bool {
        self.filter.is_active()
    }

    /// Cached customers passing the current filter, in cached order.
    /// Empty before the first refresh.
    #[must_use]
    pub fn visible(&self) -> Vec<&Customer> {
        self.cache
            .as_deref()
            .map(|customers| filter_customers(customers, &self.filter))
            .unwrap_or_default()
    }

    /// One page of the visible list.
    #[must_use]
    pub fn page(&self, params: PaginationParams) -> PaginatedResponse<Customer> {
        let visible = self.visible().into_iter().cloned().collect();
        PaginatedResponse::from_items(visible, params)
    }

    /// Delete a customer, then drop it from the cached list.
    ///
    /// # Errors
    ///
    /// Returns the repository failure; the cached list is then unchanged.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn delete(&mut self, id: &CustomerId) -> Result<(), AppError> {
        self.repo.delete(id).await?;
        if let Some(customers) = &mut self.cache {
            customers.retain(|c| &c.id != id);
        }
        info!("Customer removed from list");
        Ok(())
    }

    /// Reflect a record the caller has just written without a refetch.
    ///
    /// Replaces the cached record with the same id, or inserts it keeping
    /// newest-created first. Does nothing before the first refresh.
    pub fn apply_local(&mut self, customer: Customer) {
        let Some(customers) = &mut self.cache else {
            return;
        };
        if let Some(existing) = customers.iter_mut().find(|c| c.id == customer.id) {
            *existing = customer;
        } else {
            let at = customers
                .iter()
                .position(|c| c.created_at < customer.created_at)
                .unwrap_or(customers.len());
            customers.insert(at, customer);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use salon_crm_core::{Email, NewCustomer};

    use super::*;
    use crate::clock::SteppingClock;
    use crate::store::{
        Document, DocumentStore, FieldUpdates, Fields, MemoryStore, SortDirection, StoreError,
    };

    fn repo_over(store: Arc<dyn DocumentStore>) -> CustomerRepository {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        CustomerRepository::new(store, Arc::new(SteppingClock::starting_at(start)))
    }

    async fn seeded() -> (CustomerRepository, CustomerId, CustomerId) {
        let repo = repo_over(Arc::new(MemoryStore::new()));
        let hanako = repo
            .create(NewCustomer {
                email: Some(Email::parse("hanako@example.com").unwrap()),
                ..NewCustomer::new("田中花子", Plan::Premium, Status::FirstCounselingDone)
            })
            .await
            .unwrap();
        let misaki = repo
            .create(NewCustomer {
                email: Some(Email::parse("misaki@example.com").unwrap()),
                ..NewCustomer::new("佐藤美咲", Plan::Standard, Status::PreLearningCompleted)
            })
            .await
            .unwrap();
        (repo, hanako, misaki)
    }

    /// Serves reads from an inner store and fails every delete.
    struct FailingDeletes(MemoryStore);

    #[async_trait]
    impl DocumentStore for FailingDeletes {
        async fn create_document(&self, c: &str, f: Fields) -> Result<String, StoreError> {
            self.0.create_document(c, f).await
        }
        async fn get_document(&self, c: &str, id: &str) -> Result<Option<Document>, StoreError> {
            self.0.get_document(c, id).await
        }
        async fn update_document(&self, c: &str, id: &str, u: FieldUpdates) -> Result<(), StoreError> {
            self.0.update_document(c, id, u).await
        }
        async fn delete_document(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection reset".to_string()))
        }
        async fn list_documents(
            &self,
            c: &str,
            o: &str,
            d: SortDirection,
        ) -> Result<Vec<Document>, StoreError> {
            self.0.list_documents(c, o, d).await
        }
    }

    #[tokio::test]
    async fn test_visible_is_empty_before_refresh() {
        let (repo, _, _) = seeded().await;
        let view = CustomerListView::new(repo);
        assert!(!view.is_loaded());
        assert!(view.visible().is_empty());
    }

    #[tokio::test]
    async fn test_plan_filter_over_refreshed_list() {
        let (repo, hanako, _) = seeded().await;
        let mut view = CustomerListView::new(repo);
        assert_eq!(view.refresh().await.unwrap().len(), 2);

        view.set_plan(Some(Plan::Premium));
        let visible = view.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, hanako);
        assert!(view.has_active_filters());

        view.clear_filters();
        assert!(!view.has_active_filters());
        assert_eq!(view.visible().len(), 2);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (repo, hanako, _) = seeded().await;
        let mut view = CustomerListView::new(repo);
        view.refresh().await.unwrap();

        for term in ["hanako", "HANAKO"] {
            view.set_search(term);
            let ids: Vec<_> = view.visible().iter().map(|c| c.id.clone()).collect();
            assert_eq!(ids, vec![hanako.clone()]);
        }
    }

    #[tokio::test]
    async fn test_delete_removes_from_cache() {
        let (repo, hanako, misaki) = seeded().await;
        let mut view = CustomerListView::new(repo);
        view.refresh().await.unwrap();

        view.delete(&hanako).await.unwrap();
        let ids: Vec<_> = view.visible().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec![misaki]);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_list_unchanged() {
        let repo = repo_over(Arc::new(FailingDeletes(MemoryStore::new())));
        let id = repo
            .create(NewCustomer::new("鈴木愛", Plan::Basic, Status::PaymentReceived))
            .await
            .unwrap();
        let mut view = CustomerListView::new(repo);
        view.refresh().await.unwrap();
        let before = view.customers().unwrap().to_vec();

        let err = view.delete(&id).await.unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(view.customers().unwrap(), before.as_slice());
    }

    #[tokio::test]
    async fn test_apply_local_replaces_record() {
        let (repo, hanako, _) = seeded().await;
        let mut view = CustomerListView::new(repo);
        view.refresh().await.unwrap();

        let mut updated = view.customers().unwrap()[1].clone();
        assert_eq!(updated.id, hanako);
        updated.hair_count = 7;
        view.apply_local(updated);

        let customers = view.customers().unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[1].hair_count, 7);
    }

    #[tokio::test]
    async fn test_invalidate_drops_cache() {
        let (repo, _, _) = seeded().await;
        let mut view = CustomerListView::new(repo);
        view.refresh().await.unwrap();
        view.invalidate();
        assert!(view.customers().is_none());
    }

    #[tokio::test]
    async fn test_page() {
        let (repo, _, misaki) = seeded().await;
        let mut view = CustomerListView::new(repo);
        view.refresh().await.unwrap();

        let page = view.page(PaginationParams::new(1, 1));
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, misaki);
        assert_eq!(page.total, 2);
    }
}
