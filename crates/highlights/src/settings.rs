//! Runtime settings
//!
//! Settings are resolved in this order (later wins):
//! 1. Built-in defaults
//! 2. JSON file (~/.config/highlight-sync/settings.json), every field optional
//! 3. Environment variables
//!
//! The Mem API key may also live in ~/.config/highlight-sync/mem-api-key.txt.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::matter::{self, PollPolicy};
use crate::mem;

/// Settings filename in the config directory
const SETTINGS_FILE: &str = "settings.json";

/// API key filename in the config directory
const API_KEY_FILE: &str = "mem-api-key.txt";

/// On-disk settings format
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    data_dir: Option<PathBuf>,
    matter_api_base: Option<String>,
    mem_api_base: Option<String>,
    mem_api_key: Option<String>,
    poll_interval_secs: Option<u64>,
    poll_max_attempts: Option<u32>,
    login_deadline_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    open_pairing_artifact: Option<bool>,
}

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root for tokens, the pairing code and the ledger
    pub data_dir: PathBuf,
    pub matter_api_base: String,
    pub mem_api_base: String,
    pub mem_api_key: Option<String>,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
    pub login_deadline: Option<Duration>,
    pub request_timeout: Duration,
    /// Open the pairing code with the system viewer
    pub open_pairing_artifact: bool,
}

impl Settings {
    /// Defaults rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let poll = PollPolicy::default();
        Self {
            data_dir: data_dir.into(),
            matter_api_base: matter::DEFAULT_API_BASE.to_string(),
            mem_api_base: mem::DEFAULT_API_BASE.to_string(),
            mem_api_key: None,
            poll_interval: poll.interval,
            poll_max_attempts: poll.max_attempts,
            login_deadline: poll.deadline,
            request_timeout: Duration::from_secs(30),
            open_pairing_artifact: true,
        }
    }

    /// Load settings from the config directory and the environment
    pub fn load() -> Result<Self> {
        let data_dir = config::data_dir().context("Could not determine data directory")?;
        let mut settings = Self::with_data_dir(data_dir);

        if let Some(file) = config::load_config_json::<SettingsFile>(SETTINGS_FILE)? {
            settings.apply_file(file);
        }

        settings.apply_env(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Parse a settings file's JSON on top of defaults rooted at `data_dir`
    pub fn from_json(json: &str, data_dir: impl Into<PathBuf>) -> Result<Self> {
        let file: SettingsFile =
            serde_json::from_str(json).context("Failed to parse settings JSON")?;
        let mut settings = Self::with_data_dir(data_dir);
        settings.apply_file(file);
        Ok(settings)
    }

    fn apply_file(&mut self, file: SettingsFile) {
        if let Some(dir) = file.data_dir {
            self.data_dir = dir;
        }
        if let Some(base) = file.matter_api_base {
            self.matter_api_base = base;
        }
        if let Some(base) = file.mem_api_base {
            self.mem_api_base = base;
        }
        if file.mem_api_key.is_some() {
            self.mem_api_key = file.mem_api_key;
        }
        if let Some(secs) = file.poll_interval_secs {
            self.poll_interval = Duration::from_secs(secs);
        }
        if let Some(attempts) = file.poll_max_attempts {
            self.poll_max_attempts = attempts;
        }
        if let Some(secs) = file.login_deadline_secs {
            self.login_deadline = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(open) = file.open_pairing_artifact {
            self.open_pairing_artifact = open;
        }
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(dir) = lookup("HIGHLIGHT_SYNC_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(base) = lookup("MATTER_API_BASE") {
            self.matter_api_base = base;
        }
        if let Some(base) = lookup("MEM_API_BASE") {
            self.mem_api_base = base;
        }
        if let Some(key) = lookup("MEM_API_KEY") {
            self.mem_api_key = Some(key);
        }
    }

    /// Resolve the Mem API key from settings, then the key file
    pub fn resolve_mem_api_key(&self) -> Result<String> {
        if let Some(key) = self.mem_api_key.as_deref().map(str::trim)
            && !key.is_empty()
        {
            return Ok(key.to_string());
        }

        let path = config::config_file(API_KEY_FILE)?;
        read_api_key_file(&path).with_context(|| {
            format!(
                "No Mem API key: set MEM_API_KEY, add mem_api_key to {} or write the key to {}",
                SETTINGS_FILE,
                path.display()
            )
        })
    }

    pub fn tokens_path(&self) -> PathBuf {
        self.data_dir.join("matter").join("tokens.json")
    }

    pub fn pairing_artifact_path(&self) -> PathBuf {
        self.data_dir.join("matter").join("login.svg")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("mem").join("synced_articles.json")
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: self.poll_interval,
            max_attempts: self.poll_max_attempts,
            deadline: self.login_deadline,
        }
    }
}

/// Read an API key file, ignoring surrounding whitespace
pub fn read_api_key_file(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read API key file: {}", path.display()))?;
    let key = content.trim();
    if key.is_empty() {
        anyhow::bail!("API key file is empty: {}", path.display());
    }
    Ok(key.to_string())
}
