//! Error handling - maps failures to `{ message, error? }` JSON responses.

use actix_web::{
    HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode,
};
use blog_core::error::{DomainError, RepoError};
use blog_shared::ErrorResponse;
use std::fmt;

/// Application-level error type rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// Request body that could not be parsed; carries the parser's detail.
    MalformedBody(String),
    /// Store failure. `context` names the operation, `source` is reported
    /// back to the caller as the error detail.
    Store {
        context: &'static str,
        source: RepoError,
    },
}

impl AppError {
    /// No blog post with this id, including ids the store could never issue.
    pub fn blog_not_found(id: &str) -> Self {
        DomainError::NotFound {
            entity_type: "Blog",
            id: id.to_string(),
        }
        .into()
    }

    /// Wrap a store error with the message for the failed operation.
    pub fn store(context: &'static str) -> impl FnOnce(RepoError) -> Self {
        move |source| AppError::Store { context, source }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::MalformedBody(detail) => write!(f, "Invalid request body: {}", detail),
            AppError::Store { context, source } => write!(f, "{}: {}", context, source),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => ErrorResponse::new(msg),
            AppError::MalformedBody(detail) => {
                ErrorResponse::new("Invalid request body").with_error(detail)
            }
            AppError::Store { context, source } => {
                tracing::error!(error = %source, "{}", context);
                ErrorResponse::new(*context).with_error(store_detail(source))
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

/// The driver's own message, without the repository's prefix.
fn store_detail(err: &RepoError) -> &str {
    match err {
        RepoError::Connection(msg) | RepoError::Query(msg) | RepoError::Decode(msg) => msg,
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                tracing::debug!(entity_type, id = %id, "Lookup missed");
                AppError::NotFound(format!("{} not found", entity_type))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

/// Error handler for the JSON body extractor.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::MalformedBody(err.to_string()).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
