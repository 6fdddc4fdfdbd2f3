//! HTTP handlers and route configuration.

mod blogs;
mod health;

use actix_web::{HttpResponse, web};
use blog_shared::ErrorResponse;

use crate::middleware::error::json_error_handler;

/// Configure all application routes, with a JSON 404 for anything unmatched.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .default_service(web::to(route_not_found))
        .route("/", web::get().to(health::liveness))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                // Blog routes
                .service(
                    web::scope("/blogs")
                        .route("", web::get().to(blogs::list_blogs))
                        .route("", web::post().to(blogs::create_blog))
                        .route("/{id}", web::get().to(blogs::get_blog))
                        .route("/{id}", web::put().to(blogs::update_blog))
                        .route("/{id}", web::delete().to(blogs::delete_blog)),
                ),
        );
}

/// Fallback for unmatched routes.
async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Route not found"))
}
