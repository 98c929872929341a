//! Article model representing one highlighted item of the reading feed

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an article (Matter feed item ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleId(pub String);

impl ArticleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ArticleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ArticleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single highlight made while reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Highlighted text
    pub text: String,
    /// Optional note attached to the highlight
    pub note: Option<String>,
    /// Creation timestamp as reported by the source service
    pub created_date: String,
}

impl Annotation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            note: None,
            created_date: String::new(),
        }
    }
}

/// An article from the highlights feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub url: String,
    /// Author display name, if the source knows one
    pub author: Option<String>,
    /// Furthest read position, 0.0 to 1.0
    pub max_read_percentage: f64,
    /// Highlights in the order they appear in the source
    pub annotations: Vec<Annotation>,
}

impl Article {
    /// Start building an article
    pub fn builder(id: impl Into<ArticleId>) -> ArticleBuilder {
        ArticleBuilder::new(id.into())
    }
}

/// Builder for [`Article`]
#[derive(Debug)]
pub struct ArticleBuilder {
    article: Article,
}

impl ArticleBuilder {
    fn new(id: ArticleId) -> Self {
        Self {
            article: Article {
                id,
                title: String::new(),
                url: String::new(),
                author: None,
                max_read_percentage: 0.0,
                annotations: Vec::new(),
            },
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.article.title = title.into();
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.article.url = url.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.article.author = Some(author.into());
        self
    }

    pub fn max_read_percentage(mut self, percentage: f64) -> Self {
        self.article.max_read_percentage = percentage;
        self
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.article.annotations.push(annotation);
        self
    }

    pub fn annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.article.annotations = annotations;
        self
    }

    pub fn build(self) -> Article {
        self.article
    }
}

/// One page of the highlights feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    /// Items as served, newest first
    pub items: Vec<Article>,
    /// Fully-qualified URL of the next page
    pub next: Option<String>,
}
