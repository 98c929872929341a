//! Sync engine for delivering highlights
//!
//! Provides idempotent sync passes that can be safely retried.

mod ledger;
mod orchestrator;

pub use ledger::SyncLedger;
pub use orchestrator::{SyncOrchestrator, SyncReport};
