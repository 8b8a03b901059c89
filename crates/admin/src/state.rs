//! Shared application state.

use std::sync::Arc;

use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, CrmConfig, StoreBackend};
use crate::db::CustomerRepository;
use crate::store::{DocumentStore, FirestoreStore, MemoryStore};
use crate::views::CustomerListView;

/// Handles shared by every screen and command.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Connect to the configured document store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the store client cannot be built.
    pub fn from_config(config: &CrmConfig) -> Result<Self, ConfigError> {
        let store: Arc<dyn DocumentStore> = match &config.store {
            StoreBackend::Firestore(firestore) => {
                info!(
                    project = %firestore.project_id,
                    database = %firestore.database,
                    emulator = firestore.emulator_host.is_some(),
                    bearer_auth = firestore.has_access_token(),
                    "Using Firestore store"
                );
                Arc::new(FirestoreStore::new(firestore)?)
            }
            StoreBackend::Memory => {
                info!("Using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(store, Arc::new(SystemClock::new())))
    }

    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, clock }),
        }
    }

    /// State over a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock::new()))
    }

    #[must_use]
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.inner.store)
    }

    #[must_use]
    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.store(), Arc::clone(&self.inner.clock))
    }

    /// A fresh customer list screen with nothing loaded.
    #[must_use]
    pub fn customer_list(&self) -> CustomerListView {
        CustomerListView::new(self.customers())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_repositories_share_one_store() {
        let state = AppState::from_config(&CrmConfig::memory()).unwrap();
        let id = crate::seed::seed_customers(&state.customers()).await.unwrap();

        let mut view = state.customer_list();
        assert_eq!(view.refresh().await.unwrap().len(), id.len());
    }
}
