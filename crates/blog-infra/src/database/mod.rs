//! Blog store backends and connection lifecycle.

mod connections;
mod memory;

#[cfg(feature = "mongodb")]
mod mongo;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_repo;

pub use connections::{BlogStore, DatabaseConfig, MongoConfig, PostgresConfig, StoreBackend};
pub use memory::InMemoryBlogRepository;

#[cfg(feature = "mongodb")]
pub use mongo::MongoBlogRepository;

#[cfg(feature = "postgres")]
pub use postgres_repo::PostgresBlogRepository;

#[cfg(all(test, feature = "postgres"))]
mod tests;
