//! Domain models for highlights, credentials and notes

mod article;
mod credentials;
mod note;

pub use article::{Annotation, Article, ArticleBuilder, ArticleId, FeedPage};
pub use credentials::Credentials;
pub use note::NotePayload;
