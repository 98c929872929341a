//! JSON file-backed stores
//!
//! Writes go through [`config::save_json_file`], which writes a temporary
//! sibling and renames it over the record.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::{CredentialStore, LedgerStore};
use crate::models::Credentials;

/// Token pair stored as `{"access_token": .., "refresh_token": ..}`
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credentials>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let credentials: Credentials = config::load_json_file(&self.path)?;
        if !credentials.is_complete() {
            anyhow::bail!(
                "Credential record is incomplete: {}",
                self.path.display()
            );
        }
        Ok(Some(credentials))
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        if !credentials.is_complete() {
            anyhow::bail!("Refusing to persist an incomplete credential pair");
        }
        config::save_json_file(&self.path, credentials)
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove credential record: {}", self.path.display())
            })?;
        }
        Ok(())
    }
}

/// Ledger stored as a JSON array of article ids
pub struct FileLedgerStore {
    path: PathBuf,
}

impl FileLedgerStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for FileLedgerStore {
    fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        config::load_json_file(&self.path)
    }

    fn save(&self, ids: &[String]) -> Result<()> {
        config::save_json_file(&self.path, &ids)
    }
}
