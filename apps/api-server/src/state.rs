//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::BlogRepository;
use blog_infra::{BlogStore, StoreBackend};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blogs: Arc<dyn BlogRepository>,
    pub store_backend: StoreBackend,
}

impl AppState {
    /// Build the application state over an opened store.
    pub fn new(store: &BlogStore) -> Self {
        tracing::info!(backend = %store.backend(), "Application state initialized");

        Self {
            blogs: store.repository(),
            store_backend: store.backend(),
        }
    }

    /// State over an arbitrary repository.
    #[cfg(test)]
    pub fn with_repository(blogs: Arc<dyn BlogRepository>) -> Self {
        Self {
            blogs,
            store_backend: StoreBackend::Memory,
        }
    }
}
