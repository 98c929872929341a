//! Presenting the pairing code to the user
//!
//! The Matter app approves a login by scanning the session token as a QR
//! code, so the token is rendered to an SVG image.

use anyhow::{Context, Result};
use log::{info, warn};
use qrcode::QrCode;
use qrcode::render::svg;
use std::fs;
use std::path::{Path, PathBuf};

/// Shows a pairing code so the user can approve it in the Matter app
pub trait PairingRenderer: Send + Sync {
    /// Make the pairing code available to the user
    fn present(&self, session_token: &str) -> Result<()>;

    /// Remove whatever `present` left behind
    fn discard(&self) -> Result<()>;
}

/// Render a session token as a QR code SVG document
pub fn render_qr_svg(session_token: &str) -> Result<String> {
    let code = QrCode::new(session_token.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to encode pairing code: {}", e))?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(256, 256)
        .quiet_zone(true)
        .build())
}

/// Writes the pairing code as a QR image and optionally opens it
pub struct FilePairingArtifact {
    path: PathBuf,
    open_viewer: bool,
}

impl FilePairingArtifact {
    pub fn new(path: impl AsRef<Path>, open_viewer: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            open_viewer,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PairingRenderer for FilePairingArtifact {
    fn present(&self, session_token: &str) -> Result<()> {
        let image = render_qr_svg(session_token)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, image).with_context(|| {
            format!("Failed to write pairing code: {}", self.path.display())
        })?;

        info!(
            "LOGIN - Scan the QR code at {} with your Matter app (Profile > Sign into Web)",
            self.path.display()
        );

        if self.open_viewer
            && let Err(e) = open::that(&self.path)
        {
            warn!("Failed to open pairing code: {}. Please open it manually.", e);
        }

        Ok(())
    }

    fn discard(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove pairing code: {}", self.path.display())
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_present_and_discard() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matter").join("login.svg");
        let artifact = FilePairingArtifact::new(&path, false);

        artifact.present("pairing-token").unwrap();
        let image = fs::read_to_string(&path).unwrap();
        assert!(image.contains("<svg"));
        assert!(image.contains("</svg>"));
        // The raw token is encoded, not written as text
        assert!(!image.contains("pairing-token"));

        artifact.discard().unwrap();
        assert!(!path.exists());

        // Discarding twice is fine
        artifact.discard().unwrap();
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = render_qr_svg("token-a").unwrap();
        assert_eq!(first, render_qr_svg("token-a").unwrap());
        assert_ne!(first, render_qr_svg("token-b").unwrap());
    }
}
