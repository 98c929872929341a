//! Mem API integration
//!
//! Notes can only be created, never updated, so deduplication happens
//! client-side through the sync ledger.

mod client;

pub use client::{CreatedNote, MemClient, NoteTarget};

/// Default API root, including the API version
pub const DEFAULT_API_BASE: &str = "https://api.mem.ai/v0";

/// Mem API response types
pub mod api {
    use serde::Deserialize;

    /// Response from creating a mem
    #[derive(Debug, Deserialize)]
    pub struct CreateMemResponse {
        pub id: String,
        pub url: Option<String>,
    }
}
