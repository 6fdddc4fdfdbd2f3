//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a create or update request.
///
/// Every field is optional on the wire so that a missing field surfaces as a
/// validation failure rather than a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogPostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

/// A stored blog post as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_uses_camel_case_timestamps() {
        let now = Utc::now();
        let response = BlogPostResponse {
            id: "id".to_string(),
            title: "t".to_string(),
            content: "c".to_string(),
            author: "a".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn request_tolerates_missing_fields() {
        let req: BlogPostRequest = serde_json::from_str(r#"{"title":"only"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("only"));
        assert!(req.content.is_none());
        assert!(req.author.is_none());
    }
}
