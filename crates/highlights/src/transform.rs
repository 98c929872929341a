//! Rendering articles into note bodies

use crate::models::{Article, NotePayload};

const LINE_SEPARATOR: &str = "\r\n";

/// Author line value when the source has no author name
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Render an article as a note
///
/// Layout: title heading, info section (author, URL), an empty summary
/// section, then one bullet per highlight in source order. The output
/// depends only on the article.
pub fn transform(article: &Article) -> NotePayload {
    let author = article.author.as_deref().unwrap_or(UNKNOWN_AUTHOR);

    let mut lines = vec![
        format!("#  {}", article.title),
        "## Info".to_string(),
        format!("- **AUTHOR**: {}", author),
        format!("- **URL**: {}", article.url),
        "---".to_string(),
        "## Summary".to_string(),
        "---".to_string(),
        "## Notes".to_string(),
    ];
    lines.extend(article.annotations.iter().map(|a| format!("- {}", a.text)));

    NotePayload::new(lines.join(LINE_SEPARATOR))
}
