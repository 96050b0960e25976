//! Bazaar Server - multi-role marketplace core
//!
//! # Architecture overview
//!
//! The interesting part of a marketplace is the order lifecycle state
//! machine and the two ledgers it moves: product stock and wallet balances.
//! Everything here is arranged so that a status transition and the ledger
//! rows it touches commit or roll back as one redb write transaction.
//!
//! # Module structure
//!
//! ```text
//! bazaar-server/src/
//! ├── core/          # Configuration, shared state, HTTP bootstrap
//! ├── storage/       # redb database and tables
//! ├── inventory/     # Inventory ledger (reserve/release primitives)
//! ├── wallet/        # Wallet ledger (debit/credit primitives)
//! ├── orders/        # Order lifecycle engine (commands, events, snapshots)
//! ├── returns/       # Return/refund workflow + refund policy hook
//! ├── reviews/       # Review gate
//! ├── services/      # Catalog and account administration
//! ├── routes/        # HTTP API (axum)
//! └── utils/         # Logging, time helpers
//! ```

pub mod core;
pub mod inventory;
pub mod orders;
pub mod returns;
pub mod reviews;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;
pub mod wallet;

// Re-export public types
pub use core::{AppState, Config, Server};
pub use orders::{OrdersManager, OrderError};
pub use returns::{RefundPolicy, ReturnService};
pub use reviews::ReviewService;
pub use services::{AccountService, CatalogService};
pub use storage::Storage;

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____
   / __ )____ _____  ____ _____ ______
  / __  / __ `/_  / / __ `/ __ `/ ___/
 / /_/ / /_/ / / /_/ /_/ / /_/ / /
/_____/\__,_/ /___/\__,_/\__,_/_/

  marketplace server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Prepare the process environment: dotenv and logging
pub fn setup_environment() -> anyhow::Result<()> {
    // Missing .env is fine; environment variables still apply
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
