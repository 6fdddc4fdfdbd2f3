//! Blog post CRUD handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_core::domain::{BlogDraft, BlogPost};
use blog_shared::MessageResponse;
use blog_shared::dto::{BlogPostRequest, BlogPostResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(post: BlogPost) -> BlogPostResponse {
    BlogPostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        author: post.author,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn draft_from(req: BlogPostRequest) -> AppResult<BlogDraft> {
    Ok(BlogDraft::from_fields(req.title, req.content, req.author)?)
}

/// GET /api/blogs - newest first
pub async fn list_blogs(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state
        .blogs
        .list_newest_first()
        .await
        .map_err(AppError::store("Error fetching blogs"))?;

    let body: Vec<BlogPostResponse> = posts.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .blogs
        .find_by_id(&id)
        .await
        .map_err(AppError::store("Error fetching blog"))?
        .ok_or_else(|| AppError::blog_not_found(&id))?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// POST /api/blogs
pub async fn create_blog(
    state: web::Data<AppState>,
    body: web::Json<BlogPostRequest>,
) -> AppResult<HttpResponse> {
    let draft = draft_from(body.into_inner())?;

    let saved = state
        .blogs
        .create(draft, Utc::now())
        .await
        .map_err(AppError::store("Error creating blog"))?;

    tracing::info!(blog_id = %saved.id, "Blog post created");
    Ok(HttpResponse::Created().json(to_response(saved)))
}

/// PUT /api/blogs/{id}
pub async fn update_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BlogPostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let draft = draft_from(body.into_inner())?;

    let updated = state
        .blogs
        .update(&id, draft, Utc::now())
        .await
        .map_err(AppError::store("Error updating blog"))?
        .ok_or_else(|| AppError::blog_not_found(&id))?;

    tracing::info!(blog_id = %updated.id, "Blog post updated");
    Ok(HttpResponse::Ok().json(to_response(updated)))
}

/// DELETE /api/blogs/{id}
pub async fn delete_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let deleted = state
        .blogs
        .delete(&id)
        .await
        .map_err(AppError::store("Error deleting blog"))?;

    if !deleted {
        return Err(AppError::blog_not_found(&id));
    }

    tracing::info!(blog_id = %id, "Blog post deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Blog deleted successfully")))
}
