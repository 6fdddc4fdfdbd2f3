//! MongoDB document store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Document, doc};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use blog_core::domain::{BlogDraft, BlogPost};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, BlogRepository};

/// Stored shape of a blog post. Ids are ObjectIds, exposed as 24-digit hex;
/// timestamps are BSON dates, so they carry millisecond precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlogDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    content: String,
    author: String,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl BlogDocument {
    fn new(draft: BlogDraft, created_at: DateTime<Utc>) -> Self {
        let created_at = to_bson_date(created_at);
        Self {
            id: ObjectId::new(),
            title: draft.title,
            content: draft.content,
            author: draft.author,
            created_at,
            updated_at: created_at,
        }
    }
}

impl TryFrom<BlogDocument> for BlogPost {
    type Error = RepoError;

    fn try_from(document: BlogDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: document.id.to_hex(),
            title: document.title,
            content: document.content,
            author: document.author,
            created_at: from_bson_date(document.created_at)?,
            updated_at: from_bson_date(document.updated_at)?,
        })
    }
}

fn to_bson_date(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_date(at: bson::DateTime) -> Result<DateTime<Utc>, RepoError> {
    DateTime::<Utc>::from_timestamp_millis(at.timestamp_millis())
        .ok_or_else(|| RepoError::Decode(format!("timestamp out of range: {at}")))
}

/// Ids that are not ObjectIds can never match a document.
fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn id_filter(id: ObjectId) -> Document {
    doc! { "_id": id }
}

fn decode(document: Document) -> Result<BlogPost, RepoError> {
    let stored: BlogDocument =
        bson::from_document(document).map_err(|e| RepoError::Decode(e.to_string()))?;
    BlogPost::try_from(stored)
}

/// Decode a listing, leaving out documents that do not have the blog shape.
fn decode_listed(documents: Vec<Document>) -> Vec<BlogPost> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get("_id").cloned();
            match decode(document) {
                Ok(post) => Some(post),
                Err(e) => {
                    tracing::warn!(?id, error = %e, "Skipping undecodable blog document");
                    None
                }
            }
        })
        .collect()
}

/// Pipeline update: replace the text fields and move `updatedAt` to the new
/// time, never before `createdAt`.
fn update_pipeline(draft: BlogDraft, updated_at: DateTime<Utc>) -> Vec<Document> {
    vec![doc! {
        "$set": {
            "title": draft.title,
            "content": draft.content,
            "author": draft.author,
            "updatedAt": { "$max": ["$createdAt", to_bson_date(updated_at)] },
        }
    }]
}

fn query_error(e: mongodb::error::Error) -> RepoError {
    RepoError::Query(e.to_string())
}

/// MongoDB blog post repository over a single collection.
pub struct MongoBlogRepository {
    collection: Collection<BlogDocument>,
}

impl MongoBlogRepository {
    pub fn new(client: &Client, database: &str, collection: &str) -> Self {
        Self {
            collection: client.database(database).collection(collection),
        }
    }

    /// Create the `createdAt` index used by the newest-first listing.
    pub async fn ensure_indexes(&self) -> Result<(), RepoError> {
        let model = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("createdAt_desc".to_string())
                    .build(),
            )
            .build();

        self.collection
            .create_index(model)
            .await
            .map_err(query_error)?;
        tracing::debug!(collection = %self.collection.name(), "Blog indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<BlogPost, str> for MongoBlogRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>, RepoError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        self.collection
            .find_one(id_filter(id))
            .await
            .map_err(query_error)?
            .map(BlogPost::try_from)
            .transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool, RepoError> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };

        let result = self
            .collection
            .delete_one(id_filter(id))
            .await
            .map_err(query_error)?;

        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl BlogRepository for MongoBlogRepository {
    async fn list_newest_first(&self) -> Result<Vec<BlogPost>, RepoError> {
        let documents: Vec<Document> = self
            .collection
            .clone_with_type::<Document>()
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(query_error)?
            .try_collect()
            .await
            .map_err(query_error)?;

        Ok(decode_listed(documents))
    }

    async fn create(
        &self,
        draft: BlogDraft,
        created_at: DateTime<Utc>,
    ) -> Result<BlogPost, RepoError> {
        let document = BlogDocument::new(draft, created_at);
        self.collection
            .insert_one(&document)
            .await
            .map_err(query_error)?;

        tracing::debug!(blog_id = %document.id, "Inserted blog document");
        // Return what was stored, at the store's timestamp precision.
        BlogPost::try_from(document)
    }

    async fn update(
        &self,
        id: &str,
        draft: BlogDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, RepoError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        self.collection
            .find_one_and_update(id_filter(id), update_pipeline(draft, updated_at))
            .return_document(ReturnDocument::After)
            .await
            .map_err(query_error)?
            .map(BlogPost::try_from)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BlogDraft {
        BlogDraft {
            title: "t".to_string(),
            content: "c".to_string(),
            author: "a".to_string(),
        }
    }

    #[test]
    fn new_document_truncates_to_millis() {
        let now = Utc::now();
        let post = BlogPost::try_from(BlogDocument::new(draft(), now)).unwrap();

        assert_eq!(post.id.len(), 24);
        assert_eq!(post.created_at.timestamp_millis(), now.timestamp_millis());
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn document_uses_mongo_field_names() {
        let document = BlogDocument::new(draft(), Utc::now());

        let stored = bson::to_document(&document).unwrap();

        assert_eq!(stored.get_object_id("_id").unwrap(), document.id);
        assert!(stored.get_datetime("createdAt").is_ok());
        assert!(stored.get_datetime("updatedAt").is_ok());
    }

    #[test]
    fn only_object_ids_are_lookup_keys() {
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex()), Some(id));
        assert_eq!(parse_id("not-an-id"), None);
        assert_eq!(parse_id("67e55044-10b1-426f-9247-bb680e5fe0c8"), None);
    }

    #[test]
    fn existing_documents_decode_with_their_object_id() {
        let id = ObjectId::new();
        let existing = doc! {
            "_id": id,
            "title": "t",
            "content": "c",
            "author": "a",
            "createdAt": bson::DateTime::now(),
            "updatedAt": bson::DateTime::now(),
            "__v": 0,
        };

        let post = decode(existing).unwrap();
        assert_eq!(post.id, id.to_hex());
    }

    #[test]
    fn listing_skips_documents_that_do_not_decode() {
        let good = bson::to_document(&BlogDocument::new(draft(), Utc::now())).unwrap();
        let foreign_id = doc! {
            "_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "title": "t",
            "content": "c",
            "author": "a",
            "createdAt": bson::DateTime::now(),
            "updatedAt": bson::DateTime::now(),
        };
        let missing_fields = doc! { "_id": ObjectId::new(), "title": "only" };

        let listed = decode_listed(vec![foreign_id, good, missing_fields]);

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "t");
    }

    #[test]
    fn update_never_moves_updated_at_before_created_at() {
        let at = Utc::now();
        let pipeline = update_pipeline(draft(), at);

        assert_eq!(pipeline.len(), 1);
        let set = pipeline[0].get_document("$set").unwrap();
        assert_eq!(set.get_str("title").unwrap(), "t");
        assert!(!set.contains_key("createdAt"));

        let max = set
            .get_document("updatedAt")
            .unwrap()
            .get_array("$max")
            .unwrap();
        assert_eq!(max[0].as_str(), Some("$createdAt"));
        assert_eq!(max[1].as_datetime(), Some(&to_bson_date(at)));
    }
}
