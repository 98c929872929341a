//! Configuration and data directory helpers for highlight-sync
//!
//! Settings and API keys live in the config directory
//! (~/.config/highlight-sync/). Runtime state such as tokens and the sync
//! ledger lives in the data directory (~/.local/share/highlight-sync/).
//!
//! Call [`init`] at application startup to bootstrap both directories.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Directory name shared by the config and data roots
const APP_DIR: &str = "highlight-sync";

/// Create the highlight-sync config and data directories
///
/// Returns the config directory. Call this once at startup, before the
/// first settings load.
pub fn init() -> Result<PathBuf> {
    ensure_dir(data_dir(), "data")?;
    ensure_dir(config_dir(), "config")
}

/// Where settings.json and the Mem API key file live
/// (~/.config/highlight-sync/)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

/// Where Matter tokens and the sync ledger live (~/.local/share/highlight-sync/)
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(APP_DIR))
}

/// Path of a named file in the highlight-sync config directory
pub fn config_file(filename: &str) -> Result<PathBuf> {
    config_dir()
        .map(|dir| dir.join(filename))
        .context("No home directory to place highlight-sync settings in")
}

/// Load an optional JSON file from the config directory
///
/// Every config file is optional, so a missing file is `Ok(None)`; a file
/// that exists but does not parse is an error.
pub fn load_config_json<T: DeserializeOwned>(filename: &str) -> Result<Option<T>> {
    let path = config_file(filename)?;
    if !path.exists() {
        return Ok(None);
    }
    load_json_file(&path).map(Some)
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse file: {}", path.display()))
}

fn ensure_dir(dir: Option<PathBuf>, kind: &str) -> Result<PathBuf> {
    let dir = dir.with_context(|| format!("No home directory for the highlight-sync {} directory", kind))?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {} directory: {}", kind, dir.display()))?;
    Ok(dir)
}

/// Save a value as JSON to an arbitrary path
///
/// The parent directory is created if needed. The content is written to a
/// temporary sibling and renamed over `path`, so readers never observe a
/// half-written file.
pub fn save_json_file<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(value)?;
    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write file: {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_dir() {
        let dir = config_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().ends_with("highlight-sync"));
    }

    #[test]
    fn test_config_file() {
        let path = config_file("settings.json").unwrap();
        assert!(path.ends_with("highlight-sync/settings.json"));
    }

    #[test]
    fn test_missing_config_json_is_none() {
        let loaded: Option<Vec<String>> =
            load_config_json("no-such-settings-file-for-tests.json").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a").join("b");

        let created = ensure_dir(Some(target.clone()), "data").unwrap();

        assert_eq!(created, target);
        assert!(target.is_dir());
        assert!(ensure_dir(None, "data").is_err());
    }

    #[test]
    fn test_save_and_load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ids.json");

        save_json_file(&path, &vec!["a", "b"]).unwrap();
        let loaded: Vec<String> = load_json_file(&path).unwrap();

        assert_eq!(loaded, vec!["a".to_string(), "b".to_string()]);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_save_json_file_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ids.json");

        save_json_file(&path, &vec!["a"]).unwrap();
        save_json_file(&path, &vec!["a", "b", "c"]).unwrap();

        let loaded: Vec<String> = load_json_file(&path).unwrap();
        assert_eq!(loaded.len(), 3);
    }

    #[test]
    fn test_load_json_file_missing() {
        let dir = TempDir::new().unwrap();
        let result: Result<Vec<String>> = load_json_file(&dir.path().join("missing.json"));
        assert!(result.is_err());
    }
}
