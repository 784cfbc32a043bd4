// Entity Models
//
// Flat records only: no relationships, no versioning, no soft-delete.

pub mod account;

pub use account::{Account, AccountType, NewAccount};
