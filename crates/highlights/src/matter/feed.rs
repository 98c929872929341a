//! Highlights feed pagination

use log::{debug, info};
use std::collections::HashSet;

use super::api::FeedResponse;
use super::{AuthSession, Endpoints, normalize_page};
use crate::error::SyncError;
use crate::http::HttpRequest;
use crate::models::{Article, FeedPage};

/// Walks the highlights feed from its root URL through every `next` page
pub struct FeedFetcher {
    root_url: String,
}

impl FeedFetcher {
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
        }
    }

    pub fn from_endpoints(endpoints: &Endpoints) -> Self {
        Self::new(endpoints.highlights_feed.as_str())
    }

    /// Fetch a single page
    pub fn fetch_page(&self, session: &mut AuthSession, url: &str) -> Result<FeedPage, SyncError> {
        let response = session.authorized_request(HttpRequest::get(url))?;

        let body: FeedResponse = response.json().map_err(|e| SyncError::RequestFailed {
            url: url.to_string(),
            reason: format!("{:#}", e),
        })?;

        Ok(normalize_page(body))
    }

    /// Fetch every page and return all articles oldest first
    ///
    /// The feed is served newest first, so the concatenated pages are
    /// reversed. A failing page, or a `next` link pointing at a page that
    /// was already fetched, aborts the whole fetch.
    pub fn fetch_all(&self, session: &mut AuthSession) -> Result<Vec<Article>, SyncError> {
        let mut articles = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(self.root_url.clone());
        let mut pages = 0;

        while let Some(url) = next {
            if !visited.insert(url.clone()) {
                return Err(SyncError::RequestFailed {
                    url,
                    reason: "feed pagination loops back to an already fetched page".into(),
                });
            }

            let page = self.fetch_page(session, &url)?;
            pages += 1;
            debug!("Fetched feed page {} with {} items", pages, page.items.len());

            articles.extend(page.items);
            next = page.next;
        }

        articles.reverse();
        info!("Fetched {} articles from {} feed pages", articles.len(), pages);
        Ok(articles)
    }
}

/// Whether an article is ready to be synced: finished and highlighted
///
/// Completion is an exact comparison against 1.0, matching how the feed
/// reports finished articles.
pub fn is_eligible(article: &Article) -> bool {
    !article.annotations.is_empty() && article.max_read_percentage == 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Annotation;

    fn article(annotations: usize, read: f64) -> Article {
        Article::builder("a")
            .title("Title")
            .max_read_percentage(read)
            .annotations((0..annotations).map(|i| Annotation::new(format!("h{}", i))).collect())
            .build()
    }

    #[test]
    fn test_unannotated_article_excluded() {
        assert!(!is_eligible(&article(0, 1.0)));
    }

    #[test]
    fn test_partially_read_article_excluded() {
        assert!(!is_eligible(&article(1, 0.99)));
        assert!(!is_eligible(&article(3, 0.0)));
    }

    #[test]
    fn test_finished_annotated_article_included() {
        assert!(is_eligible(&article(1, 1.0)));
        assert!(is_eligible(&article(5, 1.0)));
    }
}
