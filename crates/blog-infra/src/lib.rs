//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All store backends
//! - `minimal` - No external dependencies, in-memory only
//! - `mongodb` - MongoDB document store
//! - `postgres` - PostgreSQL support via SeaORM

pub mod database;

pub use database::{BlogStore, DatabaseConfig, InMemoryBlogRepository, StoreBackend};

#[cfg(feature = "mongodb")]
pub use database::MongoBlogRepository;

#[cfg(feature = "postgres")]
pub use database::PostgresBlogRepository;
