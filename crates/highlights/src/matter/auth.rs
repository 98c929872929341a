//! Matter pairing-code authentication
//!
//! Matter has no password login for integrations. Instead a one-time
//! session token is requested and shown to the user (usually as a QR code)
//! who approves it from the mobile app. Meanwhile the exchange endpoint is
//! polled until it hands out an access/refresh token pair.
//!
//! Authorized requests that come back with a non-success status trigger
//! exactly one token refresh followed by exactly one retry.

use log::{debug, error, info, warn};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::api::{TokenResponse, TriggerResponse};
use super::{CLIENT_TYPE, Endpoints, PairingRenderer};
use crate::error::SyncError;
use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::models::Credentials;
use crate::storage::CredentialStore;

/// Longest single sleep between cancellation checks while polling
const CANCEL_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Login/refresh lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    PairingIssued,
    Polling,
    Authenticated,
    Refreshing,
    Failed,
}

/// Shared flag used to abort a pending login from another thread
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How long to wait for the user to approve a pairing code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between exchange attempts
    pub interval: Duration,
    /// Upper bound on exchange attempts
    pub max_attempts: u32,
    /// Optional wall-clock limit for the whole polling phase
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    /// One attempt per second for ten minutes
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 600,
            deadline: None,
        }
    }
}

/// Authenticated access to the Matter API
pub struct AuthSession {
    http: Arc<dyn HttpClient>,
    store: Arc<dyn CredentialStore>,
    renderer: Arc<dyn PairingRenderer>,
    endpoints: Endpoints,
    poll: PollPolicy,
    state: SessionState,
    credentials: Option<Credentials>,
}

impl AuthSession {
    /// Create an unauthenticated session
    pub fn new(
        http: Arc<dyn HttpClient>,
        store: Arc<dyn CredentialStore>,
        renderer: Arc<dyn PairingRenderer>,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            http,
            store,
            renderer,
            endpoints,
            poll: PollPolicy::default(),
            state: SessionState::Unauthenticated,
            credentials: None,
        }
    }

    /// Override the default pairing poll policy
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Log in with stored credentials, or run the pairing flow if there are none
    pub fn login(&mut self, cancel: &CancellationToken) -> Result<(), SyncError> {
        match self.store.load() {
            Ok(Some(credentials)) => {
                info!("Stored tokens found, no login procedure started");
                self.credentials = Some(credentials);
                self.state = SessionState::Authenticated;
                return Ok(());
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable credential record: {:#}", e),
        }

        match self.pair(cancel) {
            Ok(credentials) => {
                self.credentials = Some(credentials);
                self.state = SessionState::Authenticated;
                Ok(())
            }
            Err(e) => {
                error!("Could not login into Matter: {}", e);
                self.credentials = None;
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    /// Clear stored tokens (logout)
    pub fn logout(&mut self) -> Result<(), SyncError> {
        self.store.clear()?;
        self.credentials = None;
        self.state = SessionState::Unauthenticated;
        Ok(())
    }

    /// Run the pairing flow and persist the resulting pair
    fn pair(&mut self, cancel: &CancellationToken) -> Result<Credentials, SyncError> {
        let session_token = self.trigger_pairing()?;
        self.state = SessionState::PairingIssued;

        self.renderer.present(&session_token).map_err(|e| {
            SyncError::LoginFailed(format!("could not present pairing code: {:#}", e))
        })?;
        self.state = SessionState::Polling;

        let result = self.poll_exchange(&session_token, cancel);

        // The pairing code is single-use either way
        if let Err(e) = self.renderer.discard() {
            warn!("Failed to remove pairing code: {:#}", e);
        }

        let credentials = result?;
        self.store.save(&credentials)?;
        info!("Saved tokens");
        Ok(credentials)
    }

    /// Request a one-time pairing token
    fn trigger_pairing(&self) -> Result<String, SyncError> {
        let request = HttpRequest::post(
            self.endpoints.qr_login_trigger.as_str(),
            json!({ "client_type": CLIENT_TYPE }),
        );

        let response = self
            .http
            .execute(&request)
            .map_err(|e| SyncError::LoginFailed(format!("trigger request failed: {:#}", e)))?;

        if !response.is_success() {
            return Err(SyncError::LoginFailed(format!(
                "trigger endpoint returned status {}",
                response.status
            )));
        }

        let body: TriggerResponse = response
            .json()
            .map_err(|e| SyncError::LoginFailed(format!("{:#}", e)))?;

        body.session_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| SyncError::LoginFailed("trigger response has no session token".into()))
    }

    /// Poll the exchange endpoint until approval, cancellation or timeout
    fn poll_exchange(
        &self,
        session_token: &str,
        cancel: &CancellationToken,
    ) -> Result<Credentials, SyncError> {
        let started = Instant::now();

        for attempt in 1..=self.poll.max_attempts {
            if cancel.is_cancelled() {
                return Err(SyncError::LoginCancelled);
            }
            if let Some(deadline) = self.poll.deadline
                && started.elapsed() >= deadline
            {
                return Err(SyncError::LoginTimeout {
                    attempts: attempt - 1,
                });
            }

            if let Some(credentials) = self.exchange(session_token)? {
                debug!("Pairing code approved after {} attempts", attempt);
                return Ok(credentials);
            }

            if attempt < self.poll.max_attempts {
                self.wait(cancel)?;
            }
        }

        Err(SyncError::LoginTimeout {
            attempts: self.poll.max_attempts,
        })
    }

    /// One exchange attempt, `None` while the code is not approved yet
    fn exchange(&self, session_token: &str) -> Result<Option<Credentials>, SyncError> {
        let request = HttpRequest::post(
            self.endpoints.qr_login_exchange.as_str(),
            json!({ "session_token": session_token }),
        );

        let response = match self.http.execute(&request) {
            Ok(response) => response,
            Err(e) => {
                debug!("Exchange attempt failed: {:#}", e);
                return Ok(None);
            }
        };

        let body: TokenResponse = match response.json() {
            Ok(body) => body,
            Err(_) => return Ok(None),
        };

        match (body.access_token, body.refresh_token) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Ok(Some(Credentials::new(access, refresh)))
            }
            (Some(access), _) if !access.is_empty() => Err(SyncError::LoginFailed(
                "exchange returned an access token without a refresh token".into(),
            )),
            _ => Ok(None),
        }
    }

    /// Sleep for one poll interval, waking early on cancellation
    fn wait(&self, cancel: &CancellationToken) -> Result<(), SyncError> {
        let until = Instant::now() + self.poll.interval;
        loop {
            if cancel.is_cancelled() {
                return Err(SyncError::LoginCancelled);
            }
            let now = Instant::now();
            if now >= until {
                return Ok(());
            }
            std::thread::sleep((until - now).min(CANCEL_CHECK_INTERVAL));
        }
    }

    /// Execute a request with the current access token
    ///
    /// A non-success status triggers one refresh and one retry. A second
    /// non-success is returned as [`SyncError::RequestFailed`]. Transport
    /// failures are returned directly since a new token cannot fix them.
    pub fn authorized_request(&mut self, request: HttpRequest) -> Result<HttpResponse, SyncError> {
        let mut refreshed = false;

        loop {
            let access_token = match (&self.state, &self.credentials) {
                (SessionState::Authenticated, Some(credentials)) => {
                    credentials.access_token().to_string()
                }
                _ => return Err(SyncError::NotAuthenticated),
            };

            let response = self
                .http
                .execute(&request.clone().bearer(&access_token))
                .map_err(|e| SyncError::RequestFailed {
                    url: request.url.clone(),
                    reason: format!("{:#}", e),
                })?;

            if response.is_success() {
                return Ok(response);
            }

            if refreshed {
                return Err(SyncError::RequestFailed {
                    url: request.url.clone(),
                    reason: format!("status {} after token refresh", response.status),
                });
            }

            warn!(
                "Request to {} returned status {}, refreshing tokens",
                request.url, response.status
            );
            self.refresh()?;
            refreshed = true;
        }
    }

    /// Exchange the refresh token for a new pair and persist it
    ///
    /// Failure leaves the session `Failed`; nothing is persisted.
    pub fn refresh(&mut self) -> Result<(), SyncError> {
        let refresh_token = match &self.credentials {
            Some(credentials) => credentials.refresh_token().to_string(),
            None => return Err(SyncError::NotAuthenticated),
        };

        info!("Refreshing access tokens");
        self.state = SessionState::Refreshing;

        let result = self
            .request_refresh(&refresh_token)
            .and_then(|credentials| {
                self.store.save(&credentials)?;
                Ok(credentials)
            });

        match result {
            Ok(credentials) => {
                self.credentials = Some(credentials);
                self.state = SessionState::Authenticated;
                info!("Tokens successfully refreshed");
                Ok(())
            }
            Err(e) => {
                error!("Could not refresh access token: {}", e);
                self.credentials = None;
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    fn request_refresh(&self, refresh_token: &str) -> Result<Credentials, SyncError> {
        let request = HttpRequest::post(
            self.endpoints.refresh_token.as_str(),
            json!({ "refresh_token": refresh_token }),
        );

        let response = self
            .http
            .execute(&request)
            .map_err(|e| SyncError::RefreshFailed(format!("{:#}", e)))?;

        if !response.is_success() {
            return Err(SyncError::RefreshFailed(format!(
                "refresh endpoint returned status {}",
                response.status
            )));
        }

        let body: TokenResponse = response
            .json()
            .map_err(|e| SyncError::RefreshFailed(format!("{:#}", e)))?;

        let access = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SyncError::RefreshFailed("response has no access token".into()))?;
        let refresh = body
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SyncError::RefreshFailed("response has no refresh token".into()))?;

        Ok(Credentials::new(access, refresh))
    }
}
