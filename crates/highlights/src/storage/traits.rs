//! Storage trait definitions

use crate::models::Credentials;
use anyhow::Result;

/// Persistence for the Matter token pair
///
/// A record either holds a complete pair or does not exist.
pub trait CredentialStore: Send + Sync {
    /// Load the stored pair, `None` if no record exists
    fn load(&self) -> Result<Option<Credentials>>;

    /// Replace the stored pair
    fn save(&self, credentials: &Credentials) -> Result<()>;

    /// Remove the stored pair (logout)
    fn clear(&self) -> Result<()>;
}

/// Persistence for the ids of articles already delivered
pub trait LedgerStore: Send + Sync {
    /// Load all recorded ids in insertion order, empty if nothing was recorded yet
    fn load(&self) -> Result<Vec<String>>;

    /// Replace the persisted id list
    fn save(&self, ids: &[String]) -> Result<()>;
}
