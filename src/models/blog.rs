use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::blog::{Blog, NewBlog};
use crate::domain::types::{BlogId, DocumentId, TypeConstraintError};
use crate::models::envelope::{MediaRecord, absolute_media_url};

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ContentChild {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// One rich-text block of a blog body.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub children: Vec<ContentChild>,
}

/// Wraps editor text into a single paragraph block; blank text yields none.
pub fn text_to_blocks(text: &str) -> Vec<ContentBlock> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    vec![ContentBlock {
        kind: "paragraph".to_string(),
        children: vec![ContentChild {
            text: trimmed.to_string(),
            kind: Some("text".to_string()),
        }],
    }]
}

/// Text of every paragraph block; other block kinds are skipped.
pub fn blocks_to_paragraphs(blocks: &[ContentBlock]) -> Vec<String> {
    blocks
        .iter()
        .filter(|block| block.kind == "paragraph")
        .map(|block| {
            block
                .children
                .iter()
                .map(|child| child.text.as_str())
                .collect::<String>()
        })
        .collect()
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogRecord {
    pub id: i64,
    pub document_id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<Vec<ContentBlock>>,
    /// JSON field, expected to be an array of strings.
    #[serde(default)]
    pub tags: Option<Value>,
    pub cover_image: Option<MediaRecord>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BlogRecord {
    pub fn into_domain(self, media_base_url: &str) -> Result<Blog, TypeConstraintError> {
        let tags = match self.tags {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };

        Ok(Blog {
            id: BlogId::new(self.id)?,
            document_id: DocumentId::new(self.document_id)?,
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            slug: self.slug,
            excerpt: self.excerpt,
            paragraphs: blocks_to_paragraphs(&self.content.unwrap_or_default()),
            tags,
            cover_image: self
                .cover_image
                .map(|media| absolute_media_url(media_base_url, &media.url)),
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Body of blog create/update requests.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BlogPayload {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: Vec<ContentBlock>,
    pub tags: Vec<String>,
}

impl From<&NewBlog> for BlogPayload {
    fn from(blog: &NewBlog) -> Self {
        Self {
            title: blog.title.as_str().to_string(),
            slug: blog.slug.as_str().to_string(),
            excerpt: blog.excerpt.clone().unwrap_or_default(),
            content: text_to_blocks(blog.content.as_deref().unwrap_or_default()),
            tags: blog.tags.clone(),
        }
    }
}
