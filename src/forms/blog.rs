use serde::Deserialize;
use validator::Validate;

use crate::domain::blog::{Blog, NewBlog};
use crate::domain::types::{BlogTitle, Slug};
use crate::forms::FormError;

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq, Eq)]
/// Blog editor input. Content is plain text, tags are comma-separated.
pub struct BlogForm {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub tags: String,
}

/// Splits `"tech, news,,"` into `["tech", "news"]`.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

impl From<&Blog> for BlogForm {
    /// Prefills the editor from an existing post.
    fn from(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            slug: blog.slug.clone().unwrap_or_default(),
            excerpt: blog.excerpt.clone().unwrap_or_default(),
            content: blog.content_text(),
            tags: blog.tags.join(", "),
        }
    }
}

impl TryFrom<&BlogForm> for NewBlog {
    type Error = FormError;

    fn try_from(form: &BlogForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let title = BlogTitle::new(form.title.as_str())
            .map_err(|err| FormError::field("title", err.to_string()))?;
        let slug = Slug::new(form.slug.as_str())
            .map_err(|err| FormError::field("slug", err.to_string()))?;

        Ok(NewBlog {
            title,
            slug,
            excerpt: Some(form.excerpt.trim().to_string()).filter(|e| !e.is_empty()),
            content: Some(form.content.trim().to_string()).filter(|c| !c.is_empty()),
            tags: split_tags(&form.tags),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_trimmed_and_blank_ones_dropped() {
        assert_eq!(split_tags(" tech, news,, ,travel "), vec!["tech", "news", "travel"]);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let form = BlogForm {
            title: "   ".to_string(),
            slug: "goa".to_string(),
            ..BlogForm::default()
        };

        let err = NewBlog::try_from(&form).unwrap_err();

        assert!(err.message_for("title").is_some());
    }

    #[test]
    fn form_becomes_payload() {
        let form = BlogForm {
            title: "Monsoon in Goa".to_string(),
            slug: "monsoon-goa".to_string(),
            excerpt: String::new(),
            content: "  Rain and beaches.  ".to_string(),
            tags: "goa, monsoon".to_string(),
        };

        let blog = NewBlog::try_from(&form).unwrap();

        assert_eq!(blog.title.as_str(), "Monsoon in Goa");
        assert_eq!(blog.excerpt, None);
        assert_eq!(blog.content.as_deref(), Some("Rain and beaches."));
        assert_eq!(blog.tags, vec!["goa", "monsoon"]);
    }
}
