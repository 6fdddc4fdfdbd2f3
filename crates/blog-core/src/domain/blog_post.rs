use chrono::{DateTime, Utc};

use crate::error::DomainError;

/// Message reported when a draft is missing one of its text fields.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Title, content, and author are required";

/// Blog post entity - the single record type the API manages.
///
/// `id` is assigned by the store that created the post and is opaque to
/// everything above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The caller-supplied part of a blog post, already checked for presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogDraft {
    pub title: String,
    pub content: String,
    pub author: String,
}

impl BlogDraft {
    /// Build a draft from optional fields, rejecting any that are absent or empty.
    pub fn from_fields(
        title: Option<String>,
        content: Option<String>,
        author: Option<String>,
    ) -> Result<Self, DomainError> {
        match (non_empty(title), non_empty(content), non_empty(author)) {
            (Some(title), Some(content), Some(author)) => Ok(Self {
                title,
                content,
                author,
            }),
            _ => Err(DomainError::Validation(REQUIRED_FIELDS_MESSAGE.to_string())),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl BlogPost {
    /// Build a freshly created post under a store-assigned id.
    pub fn new(id: impl Into<String>, draft: BlogDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            content: draft.content,
            author: draft.author,
            created_at,
            updated_at: created_at,
        }
    }

    /// Replace the text fields and refresh `updated_at`.
    ///
    /// `updated_at` never moves before `created_at`, even if the clock does.
    pub fn apply(&mut self, draft: BlogDraft, updated_at: DateTime<Utc>) {
        self.title = draft.title;
        self.content = draft.content;
        self.author = draft.author;
        self.updated_at = updated_at.max(self.created_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> BlogDraft {
        BlogDraft::from_fields(
            Some(title.to_string()),
            Some("Body".to_string()),
            Some("Ada".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn new_post_has_matching_timestamps() {
        let post = BlogPost::new("42", draft("Hello"), Utc::now());
        assert_eq!(post.created_at, post.updated_at);
        assert_eq!(post.id, "42");
        assert_eq!(post.title, "Hello");
    }

    #[test]
    fn missing_or_empty_fields_are_rejected() {
        let cases = [
            (None, Some("b"), Some("c")),
            (Some("a"), None, Some("c")),
            (Some("a"), Some("b"), None),
            (Some(""), Some("b"), Some("c")),
            (Some("a"), Some(""), Some("c")),
            (Some("a"), Some("b"), Some("")),
        ];

        for (title, content, author) in cases {
            let result = BlogDraft::from_fields(
                title.map(String::from),
                content.map(String::from),
                author.map(String::from),
            );
            match result {
                Err(DomainError::Validation(msg)) => assert_eq!(msg, REQUIRED_FIELDS_MESSAGE),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn apply_keeps_created_at() {
        let mut post = BlogPost::new("1", draft("Old"), Utc::now());
        let created_at = post.created_at;
        let later = created_at + chrono::Duration::seconds(5);

        post.apply(draft("New"), later);

        assert_eq!(post.title, "New");
        assert_eq!(post.created_at, created_at);
        assert_eq!(post.updated_at, later);
    }

    #[test]
    fn apply_never_moves_updated_at_before_creation() {
        let mut post = BlogPost::new("1", draft("Old"), Utc::now());
        let earlier = post.created_at - chrono::Duration::seconds(5);

        post.apply(draft("New"), earlier);

        assert_eq!(post.updated_at, post.created_at);
    }
}
