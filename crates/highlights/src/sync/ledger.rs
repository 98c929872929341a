//! Ledger of articles already delivered to the target service

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::SyncError;
use crate::models::ArticleId;
use crate::storage::LedgerStore;

/// Append-only set of delivered article ids
///
/// Loaded once when opened. Every new id is persisted before
/// [`SyncLedger::record_synced`] returns, so a crash can at worst re-attempt
/// the article that was in flight.
pub struct SyncLedger {
    store: Arc<dyn LedgerStore>,
    /// Insertion order, as persisted
    ids: Vec<String>,
    index: HashSet<String>,
}

impl SyncLedger {
    /// Load the ledger from its store
    pub fn open(store: Arc<dyn LedgerStore>) -> Result<Self, SyncError> {
        let ids = store.load()?;
        let index = ids.iter().cloned().collect();
        Ok(Self { store, ids, index })
    }

    pub fn is_synced(&self, id: &ArticleId) -> bool {
        self.index.contains(id.as_str())
    }

    /// Record a delivered article and persist the ledger
    ///
    /// Returns `false` if the id was already recorded; storage is not
    /// rewritten in that case. If persisting fails the id is not recorded.
    pub fn record_synced(&mut self, id: &ArticleId) -> Result<bool, SyncError> {
        if self.is_synced(id) {
            return Ok(false);
        }

        self.ids.push(id.as_str().to_string());
        if let Err(e) = self.store.save(&self.ids) {
            self.ids.pop();
            return Err(e.into());
        }
        self.index.insert(id.as_str().to_string());
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Recorded ids in insertion order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}
