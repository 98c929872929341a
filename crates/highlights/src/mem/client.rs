//! Mem API HTTP client

use anyhow::{Context, Result};
use serde_json::json;
use std::sync::Arc;
use url::Url;

use super::api::CreateMemResponse;
use crate::http::{HttpClient, HttpRequest};
use crate::models::NotePayload;

/// A note created on the target service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedNote {
    pub id: String,
}

/// Destination for rendered notes
pub trait NoteTarget: Send + Sync {
    /// Create a new note; there is no update operation
    fn create_note(&self, note: &NotePayload) -> Result<CreatedNote>;
}

/// Mem API client for creating mems
pub struct MemClient {
    http: Arc<dyn HttpClient>,
    api_key: String,
    mems_url: String,
}

impl MemClient {
    /// Create a client for the API rooted at `api_base`
    pub fn new(http: Arc<dyn HttpClient>, api_key: impl Into<String>, api_base: &str) -> Result<Self> {
        let mut base =
            Url::parse(api_base).with_context(|| format!("Invalid Mem API base: {}", api_base))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mems_url = base.join("mems").context("Invalid Mem endpoint")?.to_string();

        Ok(Self {
            http,
            api_key: api_key.into(),
            mems_url,
        })
    }

    pub fn mems_url(&self) -> &str {
        &self.mems_url
    }
}

impl NoteTarget for MemClient {
    fn create_note(&self, note: &NotePayload) -> Result<CreatedNote> {
        let request = HttpRequest::post(self.mems_url.as_str(), json!({ "content": note.content }))
            .header("Authorization", format!("ApiAccessToken {}", self.api_key));

        let response = self
            .http
            .execute(&request)
            .context("Failed to send create mem request")?;

        if !response.is_success() {
            anyhow::bail!("Mem returned status {}", response.status);
        }

        let created: CreateMemResponse = response
            .json()
            .context("Failed to parse create mem response")?;

        Ok(CreatedNote { id: created.id })
    }
}
