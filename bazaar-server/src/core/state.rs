//! Application state
//!
//! `AppState` holds the shared service singletons behind cheap clones
//! (Storage is an `Arc<Database>` internally). All services operate on the
//! same redb database, which is what lets an order transition and its
//! ledger effects share one transaction.

use std::path::Path;
use std::sync::Arc;

use crate::core::Config;
use crate::orders::OrdersManager;
use crate::returns::{FullLineRefund, ReturnService};
use crate::reviews::ReviewService;
use crate::services::{AccountService, CatalogService};
use crate::storage::Storage;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Config,
    /// Shared storage (one redb database)
    pub storage: Storage,
    /// Order lifecycle engine
    pub orders: Arc<OrdersManager>,
    /// Product catalog administration
    pub catalog: CatalogService,
    /// Account administration
    pub accounts: AccountService,
    /// Return/refund workflow
    pub returns: ReturnService,
    /// Review gate
    pub reviews: ReviewService,
}

impl AppState {
    /// Initialize all services over the database in `config.work_dir`
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let db_path = Path::new(&config.work_dir).join("bazaar.redb");
        let storage = Storage::open(&db_path)?;
        tracing::info!(db_path = %db_path.display(), "Storage opened");

        Ok(Self::with_storage(config.clone(), storage))
    }

    /// Build the state over existing storage (used by tests with the
    /// in-memory backend)
    pub fn with_storage(config: Config, storage: Storage) -> Self {
        let orders = Arc::new(OrdersManager::with_storage(
            storage.clone(),
            config.commission_rate,
        ));
        let catalog = CatalogService::new(storage.clone());
        let accounts = AccountService::new(storage.clone(), config.starting_balance);
        let returns = ReturnService::new(storage.clone(), Arc::new(FullLineRefund));
        let reviews = ReviewService::new(storage.clone());

        Self {
            config,
            storage,
            orders,
            catalog,
            accounts,
            returns,
            reviews,
        }
    }
}
