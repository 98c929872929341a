//! Matter API response normalization
//!
//! Converts feed responses to domain models.

use super::api::{FeedItem, FeedResponse};
use crate::models::{Annotation, Article, ArticleId, FeedPage};

/// Normalize a feed entry to an Article
pub fn normalize_article(item: FeedItem) -> Article {
    let content = item.content;

    let author = content
        .author
        .and_then(|a| a.any_name)
        .filter(|name| !name.trim().is_empty());

    let max_read_percentage = content
        .history
        .and_then(|h| h.max_read_percentage)
        .unwrap_or(0.0);

    let annotations = content
        .my_annotations
        .unwrap_or_default()
        .into_iter()
        .map(|a| Annotation {
            text: a.text,
            note: a.note,
            created_date: a.created_date,
        })
        .collect();

    Article {
        id: ArticleId::new(item.id),
        title: content.title,
        url: content.url,
        author,
        max_read_percentage,
        annotations,
    }
}

/// Normalize a feed response to a FeedPage, keeping the served order
pub fn normalize_page(response: FeedResponse) -> FeedPage {
    FeedPage {
        items: response.feed.into_iter().map(normalize_article).collect(),
        next: response.next.filter(|next| !next.is_empty()),
    }
}
