use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BlogDraft, BlogPost};
use crate::error::RepoError;

/// Generic repository trait defining the id-keyed operations.
///
/// An id the store could never have issued matches nothing: lookups return
/// `None` and deletes return `false`, without an error.
#[async_trait]
pub trait BaseRepository<T, ID: ?Sized + Sync>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: &ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Returns `false` if nothing matched.
    async fn delete(&self, id: &ID) -> Result<bool, RepoError>;
}

/// Blog post repository. Ids are strings in the backing store's own format.
#[async_trait]
pub trait BlogRepository: BaseRepository<BlogPost, str> {
    /// All posts, newest `created_at` first.
    async fn list_newest_first(&self) -> Result<Vec<BlogPost>, RepoError>;

    /// Store a new post under a fresh store-assigned id, with both timestamps
    /// set to `created_at`. Returns the post as stored.
    async fn create(
        &self,
        draft: BlogDraft,
        created_at: DateTime<Utc>,
    ) -> Result<BlogPost, RepoError>;

    /// Replace the text fields of an existing post and set its `updated_at`,
    /// as one store operation. `updated_at` is clamped so it never precedes
    /// `created_at`. Returns the new version, or `None` if no post has that
    /// id (in which case nothing is written).
    async fn update(
        &self,
        id: &str,
        draft: BlogDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, RepoError>;
}
