//! Service wiring: one store shared by the ledger engine and catalog service.

use std::sync::Arc;

use stockledger_infra::{CatalogService, InMemoryStore, LedgerConfig, LedgerError, StockLedger};

pub type Store = Arc<InMemoryStore>;

#[derive(Debug)]
pub struct AppServices {
    pub ledger: StockLedger<Store>,
    pub catalog: CatalogService<Store>,
}

impl AppServices {
    pub fn new(config: LedgerConfig) -> Self {
        let store: Store = Arc::new(InMemoryStore::new());
        let (ledger, catalog) = config.build(store);
        Self { ledger, catalog }
    }

    /// Run a ledger/catalog call on the blocking pool.
    ///
    /// Item transactions may wait on a lock and sleep between retries, which
    /// must not stall the async workers.
    pub async fn run<T, F>(self: &Arc<Self>, call: F) -> Result<T, LedgerError>
    where
        T: Send + 'static,
        F: FnOnce(&AppServices) -> Result<T, LedgerError> + Send + 'static,
    {
        let services = Arc::clone(self);
        match tokio::task::spawn_blocking(move || call(&services)).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "service call aborted");
                Err(LedgerError::Store(format!("service call aborted: {e}")))
            }
        }
    }
}
