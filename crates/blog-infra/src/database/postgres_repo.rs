//! PostgreSQL repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use blog_core::domain::{BlogDraft, BlogPost};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, BlogRepository};

use super::entity::blog_post::{self, Entity as BlogPostEntity};

/// PostgreSQL blog post repository. Ids are the `uuid` primary key in
/// hyphenated form.
pub struct PostgresBlogRepository {
    db: Arc<DbConn>,
}

impl PostgresBlogRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

fn query_error(e: DbErr) -> RepoError {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(e.to_string()),
        _ => RepoError::Query(e.to_string()),
    }
}

/// Ids that are not UUIDs can never match a row.
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

#[async_trait]
impl BaseRepository<BlogPost, str> for PostgresBlogRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>, RepoError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let result = BlogPostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn delete(&self, id: &str) -> Result<bool, RepoError> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };

        let result = BlogPostEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn list_newest_first(&self) -> Result<Vec<BlogPost>, RepoError> {
        let result = BlogPostEntity::find()
            .order_by_desc(blog_post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(
        &self,
        draft: BlogDraft,
        created_at: DateTime<Utc>,
    ) -> Result<BlogPost, RepoError> {
        let row = blog_post::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(draft.title),
            content: Set(draft.content),
            author: Set(draft.author),
            created_at: Set(created_at.into()),
            updated_at: Set(created_at.into()),
        };
        let model = row.insert(self.db.as_ref()).await.map_err(query_error)?;

        tracing::debug!(blog_id = %model.id, "Inserted blog post row");
        Ok(model.into())
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

        // One UPDATE ... RETURNING; no returned row means no such post.
        let changes = blog_post::ActiveModel {
            title: Set(draft.title),
            content: Set(draft.content),
            author: Set(draft.author),
            ..Default::default()
        };
        let updated_at: DateTimeWithTimeZone = updated_at.into();

        let updated = BlogPostEntity::update_many()
            .set(changes)
            .col_expr(
                blog_post::Column::UpdatedAt,
                Func::greatest([
                    Expr::col(blog_post::Column::CreatedAt).into(),
                    Expr::value(updated_at),
                ])
                .into(),
            )
            .filter(blog_post::Column::Id.eq(id))
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(updated.into_iter().next().map(Into::into))
    }
}
