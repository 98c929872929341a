//! Storage traits and implementations
//!
//! Credentials and the sync ledger sit behind small traits so the auth
//! session and the ledger can run against files in production and against
//! memory in tests.

mod file;
mod memory;
mod traits;

pub use file::{FileCredentialStore, FileLedgerStore};
pub use memory::{InMemoryCredentialStore, InMemoryLedgerStore};
pub use traits::{CredentialStore, LedgerStore};
