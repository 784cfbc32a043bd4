// Account Ledger - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod config;
pub mod db;
pub mod entities;
pub mod import;
pub mod telemetry;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::{ApiOptions, Config};
pub use db::{
    count_accounts, delete_account, get_all_accounts, insert_account, insert_accounts,
    open_database, setup_database, update_account,
};
pub use entities::{Account, AccountType, NewAccount};
pub use import::load_csv;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
