//! Access/refresh token pair for the Matter API

use serde::{Deserialize, Serialize};
use std::fmt;

/// An access/refresh token pair
///
/// Both tokens are always present. A refresh produces a new value instead of
/// mutating this one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    access_token: String,
    refresh_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Both tokens are non-empty
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

// Tokens never end up in logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_tokens() {
        let creds = Credentials::new("secret-access", "secret-refresh");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_record_format() {
        let creds = Credentials::new("a", "r");
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json, serde_json::json!({"access_token": "a", "refresh_token": "r"}));
    }

    #[test]
    fn test_partial_record_rejected() {
        let result: Result<Credentials, _> =
            serde_json::from_str(r#"{"access_token": "only-access"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_complete() {
        assert!(Credentials::new("a", "r").is_complete());
        assert!(!Credentials::new("a", "").is_complete());
        assert!(!Credentials::new("", "r").is_complete());
    }
}
