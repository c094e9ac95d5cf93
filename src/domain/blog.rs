use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{BlogId, BlogTitle, DocumentId, Slug};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Blog {
    pub id: BlogId,
    pub document_id: DocumentId,
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    /// Plain text of each paragraph block, in order.
    pub paragraphs: Vec<String>,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Blog {
    /// Paragraphs joined by newlines, the shape the editor works with.
    pub fn content_text(&self) -> String {
        self.paragraphs.join("\n")
    }

    /// Short preview of the body for table rows.
    pub fn preview(&self, max_chars: usize) -> Option<String> {
        let text = self.content_text();
        if text.is_empty() {
            return None;
        }
        let mut preview: String = text.chars().take(max_chars).collect();
        preview.push_str("...");
        Some(preview)
    }
}

/// Payload used to create or replace a blog post.
#[derive(Clone, Debug, PartialEq)]
pub struct NewBlog {
    pub title: BlogTitle,
    pub slug: Slug,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub tags: Vec<String>,
}
