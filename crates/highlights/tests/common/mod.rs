//! Shared test doubles for the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use highlights::{
    CreatedNote, HttpClient, HttpRequest, HttpResponse, NotePayload, NoteTarget, PairingRenderer,
};
use serde_json::{Value, json};

pub const API_BASE: &str = "https://matter.test/api/v11";
pub const TRIGGER_URL: &str = "https://matter.test/api/v11/qr_login/trigger/";
pub const EXCHANGE_URL: &str = "https://matter.test/api/v11/qr_login/exchange/";
pub const REFRESH_URL: &str = "https://matter.test/api/v11/token/refresh/";
pub const FEED_URL: &str = "https://matter.test/api/v11/library_items/highlights_feed/";

/// Scripted transport
///
/// Each URL has a queue of one-shot replies and an optional fallback reply
/// used once the queue is empty. Unscripted URLs answer 404.
#[derive(Default)]
pub struct ScriptedHttp {
    queued: Mutex<HashMap<String, VecDeque<Result<HttpResponse, String>>>>,
    fallback: Mutex<HashMap<String, HttpResponse>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a one-shot reply
    pub fn push(&self, url: &str, response: HttpResponse) -> &Self {
        self.queued
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(Ok(response));
        self
    }

    /// Queue a one-shot transport failure
    pub fn push_error(&self, url: &str, message: &str) -> &Self {
        self.queued
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(Err(message.to_string()));
        self
    }

    /// Reply used whenever the queue for `url` is empty
    pub fn always(&self, url: &str, response: HttpResponse) -> &Self {
        self.fallback
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> Vec<HttpRequest> {
        self.calls()
            .into_iter()
            .filter(|request| request.url == url)
            .collect()
    }

    pub fn count(&self, url: &str) -> usize {
        self.calls_to(url).len()
    }
}

impl HttpClient for ScriptedHttp {
    fn execute(&self, request: &HttpRequest) -> anyhow::Result<HttpResponse> {
        self.calls.lock().unwrap().push(request.clone());

        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&request.url)
            .and_then(|queue| queue.pop_front());

        match queued {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(self
                .fallback
                .lock()
                .unwrap()
                .get(&request.url)
                .cloned()
                .unwrap_or_else(|| HttpResponse::new(404, Value::Null))),
        }
    }
}

/// Records presented pairing codes
#[derive(Default)]
pub struct RecordingRenderer {
    pub presented: Mutex<Vec<String>>,
    pub discarded: AtomicUsize,
}

impl RecordingRenderer {
    pub fn presented(&self) -> Vec<String> {
        self.presented.lock().unwrap().clone()
    }

    pub fn discarded(&self) -> usize {
        self.discarded.load(Ordering::SeqCst)
    }
}

impl PairingRenderer for RecordingRenderer {
    fn present(&self, session_token: &str) -> anyhow::Result<()> {
        self.presented
            .lock()
            .unwrap()
            .push(session_token.to_string());
        Ok(())
    }

    fn discard(&self) -> anyhow::Result<()> {
        self.discarded.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Records delivered notes, rejecting notes whose title is in `reject`
#[derive(Default)]
pub struct RecordingTarget {
    pub delivered: Mutex<Vec<NotePayload>>,
    pub reject: Mutex<Vec<String>>,
}

impl RecordingTarget {
    pub fn rejecting(title: &str) -> Self {
        let target = Self::default();
        target.reject.lock().unwrap().push(title.to_string());
        target
    }

    pub fn delivered(&self) -> Vec<NotePayload> {
        self.delivered.lock().unwrap().clone()
    }

    /// Titles of delivered notes, in delivery order
    pub fn delivered_titles(&self) -> Vec<String> {
        self.delivered()
            .iter()
            .filter_map(|note| note.content.lines().next())
            .map(|line| line.trim_start_matches('#').trim().to_string())
            .collect()
    }
}

impl NoteTarget for RecordingTarget {
    fn create_note(&self, note: &NotePayload) -> anyhow::Result<CreatedNote> {
        let rejected = self
            .reject
            .lock()
            .unwrap()
            .iter()
            .any(|title| note.content.starts_with(&format!("#  {}\r\n", title)));
        if rejected {
            anyhow::bail!("Mem returned status 500");
        }

        let mut delivered = self.delivered.lock().unwrap();
        delivered.push(note.clone());
        Ok(CreatedNote {
            id: format!("mem-{}", delivered.len()),
        })
    }
}

/// Feed item JSON as served by Matter
pub fn article_json(id: &str, title: &str, read: f64, highlights: &[&str]) -> Value {
    let annotations: Vec<Value> = highlights
        .iter()
        .map(|text| json!({"text": text, "note": null, "created_date": "2022-03-01T10:00:00Z"}))
        .collect();

    json!({
        "id": id,
        "annotations": [],
        "recommendations": [],
        "feed_context": {},
        "content": {
            "title": title,
            "url": format!("https://example.com/{}", id),
            "author": {"any_name": "Author"},
            "publisher": {"any_name": null},
            "my_annotations": annotations,
            "history": {"last_read_percentage": read, "max_read_percentage": read},
            "tags": []
        }
    })
}

/// Feed page JSON
pub fn page_json(items: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "id": "highlights_feed",
        "current_profile": {},
        "previous": null,
        "feed": items,
        "next": next,
    })
}

pub fn tokens_json(access: &str, refresh: &str) -> Value {
    json!({"access_token": access, "refresh_token": refresh})
}
