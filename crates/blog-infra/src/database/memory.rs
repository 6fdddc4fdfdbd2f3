//! In-memory blog store - for development and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{BlogDraft, BlogPost};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, BlogRepository};

/// In-memory repository keeping posts in insertion order behind an async RwLock.
/// Ids are hyphenated UUID v4 strings.
///
/// Note: Data is lost on process restart.
pub struct InMemoryBlogRepository {
    posts: RwLock<Vec<BlogPost>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryBlogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<BlogPost, str> for InMemoryBlogRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, RepoError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn list_newest_first(&self) -> Result<Vec<BlogPost>, RepoError> {
        let posts = self.posts.read().await;
        // Reverse first so that equal timestamps keep the later insert ahead.
        let mut listed: Vec<BlogPost> = posts.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn create(
        &self,
        draft: BlogDraft,
        created_at: DateTime<Utc>,
    ) -> Result<BlogPost, RepoError> {
        let post = BlogPost::new(Uuid::new_v4().to_string(), draft, created_at);
        let mut posts = self.posts.write().await;
        posts.push(post.clone());
        Ok(post)
    }

    async fn update(
        &self,
        id: &str,
        draft: BlogDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, RepoError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.apply(draft, updated_at);
        Ok(Some(post.clone()))
    }
}
