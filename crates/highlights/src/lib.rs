//! Highlights crate - Business logic for syncing reading highlights
//!
//! This crate copies finished, highlighted Matter articles into Mem:
//! - Matter pairing-code login with persisted, refreshable tokens
//! - Highlights feed pagination in chronological order
//! - Append-only ledger of delivered articles
//! - Deterministic article-to-note rendering
//! - Incremental, crash-safe sync passes
//!
//! Every remote call goes through the [`HttpClient`] trait and all state
//! goes through the storage traits, so the whole engine can run against
//! in-memory doubles.

pub mod error;
pub mod http;
pub mod matter;
pub mod mem;
pub mod models;
pub mod settings;
pub mod storage;
pub mod sync;
pub mod transform;

pub use error::{Phase, SyncError};
pub use http::{HttpClient, HttpRequest, HttpResponse, Method, UreqClient};
pub use matter::{
    AuthSession, CancellationToken, Endpoints, FeedFetcher, FilePairingArtifact, PairingRenderer,
    PollPolicy, SessionState, is_eligible,
};
pub use mem::{CreatedNote, MemClient, NoteTarget};
pub use models::{Annotation, Article, ArticleId, Credentials, FeedPage, NotePayload};
pub use settings::Settings;
pub use storage::{
    CredentialStore, FileCredentialStore, FileLedgerStore, InMemoryCredentialStore,
    InMemoryLedgerStore, LedgerStore,
};
pub use sync::{SyncLedger, SyncOrchestrator, SyncReport};
pub use transform::transform;
