//! In-memory storage implementations
//!
//! Used for tests and for runs that must not touch the filesystem.

use anyhow::Result;
use std::sync::RwLock;

use super::{CredentialStore, LedgerStore};
use crate::models::Credentials;

/// In-memory implementation of CredentialStore
pub struct InMemoryCredentialStore {
    credentials: RwLock<Option<Credentials>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            credentials: RwLock::new(None),
        }
    }

    /// Create a store that already holds a token pair
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: RwLock::new(Some(credentials)),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Result<Option<Credentials>> {
        Ok(self.credentials.read().unwrap().clone())
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        if !credentials.is_complete() {
            anyhow::bail!("Refusing to persist an incomplete credential pair");
        }
        *self.credentials.write().unwrap() = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.credentials.write().unwrap() = None;
        Ok(())
    }
}

/// In-memory implementation of LedgerStore
pub struct InMemoryLedgerStore {
    ids: RwLock<Vec<String>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            ids: RwLock::new(Vec::new()),
        }
    }

    /// Create a store with ids already recorded
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: RwLock::new(ids.into_iter().map(Into::into).collect()),
        }
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.ids.read().unwrap().clone())
    }

    fn save(&self, ids: &[String]) -> Result<()> {
        *self.ids.write().unwrap() = ids.to_vec();
        Ok(())
    }
}
