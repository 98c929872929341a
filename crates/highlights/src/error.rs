//! Error taxonomy for a sync run

use std::fmt;

/// Phase of a run an error belongs to, used for user-facing reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Login,
    Refresh,
    Fetch,
    Delivery,
    Storage,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Login => "login",
            Phase::Refresh => "refresh",
            Phase::Fetch => "fetch",
            Phase::Delivery => "delivery",
            Phase::Storage => "storage",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the auth session, the feed fetcher and the orchestrator
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Pairing code was not approved within the polling window
    #[error("Login not approved after {attempts} polling attempts")]
    LoginTimeout { attempts: u32 },

    #[error("Login cancelled before the pairing code was approved")]
    LoginCancelled,

    /// Trigger or exchange endpoint returned an unusable response
    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Not authenticated, login first")]
    NotAuthenticated,

    /// Refresh endpoint returned no usable token pair
    #[error("Could not refresh access token: {0}")]
    RefreshFailed(String),

    /// Authorized request failed even after the single refresh-and-retry
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    /// Target service rejected the note for one article
    #[error("Could not deliver article {article_id}: {reason}")]
    DeliveryFailed { article_id: String, reason: String },

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl SyncError {
    pub fn phase(&self) -> Phase {
        match self {
            SyncError::LoginTimeout { .. }
            | SyncError::LoginCancelled
            | SyncError::LoginFailed(_)
            | SyncError::NotAuthenticated => Phase::Login,
            SyncError::RefreshFailed(_) => Phase::Refresh,
            SyncError::RequestFailed { .. } => Phase::Fetch,
            SyncError::DeliveryFailed { .. } => Phase::Delivery,
            SyncError::Storage(_) => Phase::Storage,
        }
    }
}
