//! highlight-sync - copies finished, highlighted Matter articles into Mem
//!
//! Runs one sync pass and exits. The first run asks for a pairing code to be
//! approved in the Matter app; later runs reuse the stored tokens.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use highlights::{
    AuthSession, CancellationToken, Endpoints, FeedFetcher, FileCredentialStore, FileLedgerStore,
    FilePairingArtifact, HttpClient, MemClient, Settings, SyncError, SyncLedger, SyncOrchestrator,
    UreqClient,
};
use log::{error, info};

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    match run() {
        Ok(count) => {
            info!("DONE - Synced {} articles with Mem", count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<SyncError>() {
                Some(sync_error) => error!("{} failed: {}", sync_error.phase(), sync_error),
                None => error!("Setup failed: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<usize> {
    // Bootstrap config and data directories
    if let Err(e) = config::init() {
        error!("Failed to initialize directories: {}", e);
    }

    let settings = Settings::load()?;
    let api_key = settings.resolve_mem_api_key()?;

    let http: Arc<dyn HttpClient> = Arc::new(UreqClient::new(settings.request_timeout));
    let endpoints = Endpoints::new(&settings.matter_api_base)?;

    let session = AuthSession::new(
        http.clone(),
        Arc::new(FileCredentialStore::new(settings.tokens_path())),
        Arc::new(FilePairingArtifact::new(
            settings.pairing_artifact_path(),
            settings.open_pairing_artifact,
        )),
        endpoints.clone(),
    )
    .with_poll_policy(settings.poll_policy());

    let ledger = SyncLedger::open(Arc::new(FileLedgerStore::new(settings.ledger_path())))?;
    let target = Arc::new(MemClient::new(http, api_key, &settings.mem_api_base)?);

    let mut orchestrator =
        SyncOrchestrator::new(session, FeedFetcher::from_endpoints(&endpoints), ledger, target);

    orchestrator.login(&CancellationToken::new())?;
    let report = orchestrator.sync_once()?;
    Ok(report.synced.len())
}
