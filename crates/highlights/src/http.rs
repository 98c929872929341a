//! Blocking HTTP transport
//!
//! Every remote call in the crate goes through [`HttpClient`] so the auth
//! session, feed fetcher and Mem client can be driven by a scripted client in
//! tests. Non-success statuses come back as responses; only a failure to get
//! any response at all is an error. Uses synchronous HTTP (ureq) to be
//! executor-agnostic.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request with an optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Add a header, replacing any existing header with the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Attach a bearer credential
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {}", token))
    }

    /// Look up a header value by name (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and decoded JSON body of a response
///
/// Bodies that are empty or not JSON decode to `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// A 200 response with the given body
    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body into a typed response
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone()).context("Unexpected response body")
    }
}

/// Transport used for every remote call
pub trait HttpClient: Send + Sync {
    /// Execute a request
    ///
    /// Returns `Err` only when no HTTP response was received.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// ureq-backed [`HttpClient`]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Create a client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
        }
    }
}

impl HttpClient for UreqClient {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let result = match request.method {
            Method::Get => {
                let mut builder = self.agent.get(request.url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            Method::Post => {
                let mut builder = self.agent.post(request.url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send_json(body),
                    None => builder.send_empty(),
                }
            }
        };

        match result {
            Ok(mut response) => {
                let status = response.status().as_u16();
                let body = response
                    .body_mut()
                    .read_json::<Value>()
                    .unwrap_or(Value::Null);
                Ok(HttpResponse { status, body })
            }
            // ureq reports 4xx/5xx as errors; hand them back as responses
            Err(ureq::Error::StatusCode(status)) => Ok(HttpResponse {
                status,
                body: Value::Null,
            }),
            Err(e) => Err(anyhow::Error::new(e))
                .with_context(|| format!("Failed to send request to {}", request.url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_header_replaces_same_name() {
        let request = HttpRequest::get("https://example.test")
            .bearer("old")
            .bearer("new");

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header_value("authorization"), Some("Bearer new"));
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::ok(Value::Null).is_success());
        assert!(HttpResponse::new(204, Value::Null).is_success());
        assert!(!HttpResponse::new(401, Value::Null).is_success());
        assert!(!HttpResponse::new(500, Value::Null).is_success());
    }

    #[test]
    fn test_json_body() {
        #[derive(Deserialize)]
        struct Body {
            id: String,
        }

        let response = HttpResponse::ok(json!({"id": "mem-1", "extra": true}));
        let body: Body = response.json().unwrap();
        assert_eq!(body.id, "mem-1");

        let empty = HttpResponse::new(401, Value::Null);
        assert!(empty.json::<Body>().is_err());
    }
}
