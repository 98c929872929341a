//! One incremental sync pass from Matter to Mem

use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use super::SyncLedger;
use crate::error::SyncError;
use crate::matter::{AuthSession, CancellationToken, FeedFetcher, is_eligible};
use crate::mem::NoteTarget;
use crate::models::{Article, ArticleId};
use crate::transform::transform;

/// Outcome of a sync pass
#[derive(Debug, Default, Clone)]
pub struct SyncReport {
    /// Articles delivered and recorded in this pass, oldest first
    pub synced: Vec<ArticleId>,
    /// Articles returned by the feed
    pub articles_fetched: usize,
    /// Finished, highlighted articles
    pub articles_eligible: usize,
    /// Eligible articles skipped because they were synced before or repeated in the feed
    pub articles_skipped: usize,
    /// Duration of the pass
    pub duration_ms: u64,
}

/// Composes feed fetching, filtering, deduplication and delivery
pub struct SyncOrchestrator {
    session: AuthSession,
    fetcher: FeedFetcher,
    ledger: SyncLedger,
    target: Arc<dyn NoteTarget>,
}

impl SyncOrchestrator {
    pub fn new(
        session: AuthSession,
        fetcher: FeedFetcher,
        ledger: SyncLedger,
        target: Arc<dyn NoteTarget>,
    ) -> Self {
        Self {
            session,
            fetcher,
            ledger,
            target,
        }
    }

    /// Log in, running the pairing flow if no tokens are stored
    pub fn login(&mut self, cancel: &CancellationToken) -> Result<(), SyncError> {
        self.session.login(cancel)
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn ledger(&self) -> &SyncLedger {
        &self.ledger
    }

    /// Deliver every eligible article not yet in the ledger
    ///
    /// Articles are delivered oldest first and each one is recorded as soon
    /// as its note exists. The first delivery failure ends the pass; articles
    /// recorded before it stay recorded.
    pub fn sync_once(&mut self) -> Result<SyncReport, SyncError> {
        let start = Instant::now();
        let mut report = SyncReport::default();

        if !self.session.is_authenticated() {
            return Err(SyncError::NotAuthenticated);
        }

        // 1. Fetch the whole feed, oldest first
        let articles = self.fetcher.fetch_all(&mut self.session)?;
        report.articles_fetched = articles.len();

        // 2. Keep finished, highlighted articles
        let eligible: Vec<Article> = articles.into_iter().filter(is_eligible).collect();
        report.articles_eligible = eligible.len();

        // 3. Drop already-synced articles and repeats across pages
        let mut seen = HashSet::new();
        let pending: Vec<Article> = eligible
            .into_iter()
            .filter(|a| !self.ledger.is_synced(&a.id))
            .filter(|a| seen.insert(a.id.clone()))
            .collect();
        report.articles_skipped = report.articles_eligible - pending.len();

        // 4. Deliver and record one at a time
        for article in pending {
            info!("Syncing - {}", article.title);

            let note = transform(&article);
            if let Err(e) = self.target.create_note(&note) {
                warn!(
                    "Delivery failed after {} articles were synced in this run",
                    report.synced.len()
                );
                return Err(SyncError::DeliveryFailed {
                    article_id: article.id.to_string(),
                    reason: format!("{:#}", e),
                });
            }

            if self.ledger.record_synced(&article.id)? {
                report.synced.push(article.id);
            } else {
                debug!("Article {} was already recorded", article.id);
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Sync finished: {} fetched, {} eligible, {} skipped, {} synced in {}ms",
            report.articles_fetched,
            report.articles_eligible,
            report.articles_skipped,
            report.synced.len(),
            report.duration_ms
        );
        Ok(report)
    }
}
