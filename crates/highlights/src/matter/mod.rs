//! Matter API integration
//!
//! This module provides:
//! - Pairing-code login and token refresh ([`AuthSession`])
//! - Highlights feed pagination ([`FeedFetcher`])
//! - Response normalization to domain models

mod auth;
mod feed;
mod normalize;
mod pairing;

pub use auth::{AuthSession, CancellationToken, PollPolicy, SessionState};
pub use feed::{FeedFetcher, is_eligible};
pub use normalize::{normalize_article, normalize_page};
pub use pairing::{FilePairingArtifact, PairingRenderer, render_qr_svg};

use anyhow::{Context, Result};
use url::Url;

/// Client type announced when requesting a pairing code
pub const CLIENT_TYPE: &str = "integration";

/// Default API root, including the API version
pub const DEFAULT_API_BASE: &str = "https://api.getmatter.app/api/v11";

/// Resolved Matter endpoint URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub qr_login_trigger: String,
    pub qr_login_exchange: String,
    pub refresh_token: String,
    pub highlights_feed: String,
}

impl Endpoints {
    /// Resolve all endpoints against an API root such as
    /// `https://api.getmatter.app/api/v11`
    pub fn new(api_base: &str) -> Result<Self> {
        let mut base =
            Url::parse(api_base).with_context(|| format!("Invalid Matter API base: {}", api_base))?;

        // Url::join replaces the last path segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |path: &str| -> Result<String> {
            base.join(path)
                .map(|u| u.to_string())
                .with_context(|| format!("Invalid Matter endpoint path: {}", path))
        };

        Ok(Self {
            qr_login_trigger: join("qr_login/trigger/")?,
            qr_login_exchange: join("qr_login/exchange/")?,
            refresh_token: join("token/refresh/")?,
            highlights_feed: join("library_items/highlights_feed/")?,
        })
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            qr_login_trigger: format!("{}/qr_login/trigger/", DEFAULT_API_BASE),
            qr_login_exchange: format!("{}/qr_login/exchange/", DEFAULT_API_BASE),
            refresh_token: format!("{}/token/refresh/", DEFAULT_API_BASE),
            highlights_feed: format!("{}/library_items/highlights_feed/", DEFAULT_API_BASE),
        }
    }
}

/// Matter API response types
pub mod api {
    use serde::{Deserialize, Deserializer};

    /// Response from the pairing trigger endpoint
    #[derive(Debug, Deserialize)]
    pub struct TriggerResponse {
        pub session_token: Option<String>,
    }

    /// Response from the exchange and refresh endpoints
    ///
    /// The exchange endpoint omits `access_token` until the pairing code has
    /// been approved.
    #[derive(Debug, Default, Deserialize)]
    pub struct TokenResponse {
        pub access_token: Option<String>,
        pub refresh_token: Option<String>,
    }

    /// One page of the highlights feed
    #[derive(Debug, Deserialize)]
    pub struct FeedResponse {
        #[serde(default)]
        pub feed: Vec<FeedItem>,
        pub next: Option<String>,
    }

    /// Feed entry wrapping the article content
    #[derive(Debug, Deserialize)]
    pub struct FeedItem {
        #[serde(deserialize_with = "string_or_number")]
        pub id: String,
        pub content: Content,
    }

    #[derive(Debug, Deserialize)]
    pub struct Content {
        #[serde(default)]
        pub title: String,
        #[serde(default)]
        pub url: String,
        pub author: Option<Author>,
        pub my_annotations: Option<Vec<Annotation>>,
        pub history: Option<History>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Author {
        pub any_name: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct History {
        pub max_read_percentage: Option<f64>,
        pub last_read_percentage: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Annotation {
        #[serde(default)]
        pub text: String,
        pub note: Option<String>,
        #[serde(default)]
        pub created_date: String,
    }

    /// Feed ids have been served both as strings and as integers
    fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Id {
            Text(String),
            Number(i64),
        }

        Ok(match Id::deserialize(deserializer)? {
            Id::Text(s) => s,
            Id::Number(n) => n.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_base() {
        let endpoints = Endpoints::new(DEFAULT_API_BASE).unwrap();
        assert_eq!(endpoints, Endpoints::default());
        assert_eq!(
            endpoints.qr_login_trigger,
            "https://api.getmatter.app/api/v11/qr_login/trigger/"
        );
    }

    #[test]
    fn test_endpoints_trailing_slash() {
        let endpoints = Endpoints::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            endpoints.highlights_feed,
            "http://localhost:8080/api/library_items/highlights_feed/"
        );
    }

    #[test]
    fn test_endpoints_invalid_base() {
        assert!(Endpoints::new("not a url").is_err());
    }
}
