use std::fmt;
use std::sync::Arc;
#[cfg(any(feature = "mongodb", feature = "postgres"))]
use std::time::Duration;

use blog_core::error::RepoError;
use blog_core::ports::BlogRepository;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn};

#[cfg(feature = "mongodb")]
use mongodb::Client;
#[cfg(feature = "mongodb")]
use mongodb::bson::doc;
#[cfg(feature = "mongodb")]
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};

use super::memory::InMemoryBlogRepository;

/// Which store backs the blog repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    MongoDb,
    Postgres,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::MongoDb => "mongodb",
            StoreBackend::Postgres => "postgres",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the MongoDB document store.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

/// Configuration for the PostgreSQL store.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Store selection plus the settings for the chosen backend.
#[derive(Debug, Clone)]
pub enum DatabaseConfig {
    Memory,
    MongoDb(MongoConfig),
    Postgres(PostgresConfig),
}

impl DatabaseConfig {
    pub fn backend(&self) -> StoreBackend {
        match self {
            DatabaseConfig::Memory => StoreBackend::Memory,
            DatabaseConfig::MongoDb(_) => StoreBackend::MongoDb,
            DatabaseConfig::Postgres(_) => StoreBackend::Postgres,
        }
    }
}

/// Live connection owned by the store, kept so it can be closed on shutdown.
enum Connection {
    Memory,
    #[cfg(feature = "mongodb")]
    MongoDb(Client),
    #[cfg(feature = "postgres")]
    Postgres(Arc<DbConn>),
}

/// Process-wide blog store: opened once at startup, handed to the HTTP layer
/// as a repository, and closed after the server stops.
///
/// # Example
/// ```ignore
/// let store = BlogStore::connect(&config).await?;
/// let repo = store.repository();
/// // ... serve requests ...
/// store.close().await?;
/// ```
pub struct BlogStore {
    backend: StoreBackend,
    repository: Arc<dyn BlogRepository>,
    connection: Connection,
}

impl BlogStore {
    /// Open the configured store. Any failure here is meant to abort startup.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepoError> {
        tracing::info!(backend = %config.backend(), "Initializing blog store...");

        let store = match config {
            DatabaseConfig::Memory => Self::in_memory(),
            DatabaseConfig::MongoDb(mongo) => Self::connect_mongodb(mongo).await?,
            DatabaseConfig::Postgres(postgres) => Self::connect_postgres(postgres).await?,
        };

        tracing::info!(backend = %store.backend, "Blog store ready");
        Ok(store)
    }

    /// A store that lives only in this process.
    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            repository: Arc::new(InMemoryBlogRepository::new()),
            connection: Connection::Memory,
        }
    }

    #[cfg(feature = "mongodb")]
    async fn connect_mongodb(config: &MongoConfig) -> Result<Self, RepoError> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.app_name = Some("blog-api".to_string());
        options.connect_timeout = Some(Duration::from_secs(10));
        options.server_selection_timeout = Some(Duration::from_secs(10));

        let client =
            Client::with_options(options).map_err(|e| RepoError::Connection(e.to_string()))?;

        // The driver connects lazily; ping so an unreachable server fails here.
        client
            .database(&config.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "MongoDB connected"
        );

        let repository =
            super::mongo::MongoBlogRepository::new(&client, &config.database, &config.collection);
        repository.ensure_indexes().await?;

        Ok(Self {
            backend: StoreBackend::MongoDb,
            repository: Arc::new(repository),
            connection: Connection::MongoDb(client),
        })
    }

    #[cfg(not(feature = "mongodb"))]
    async fn connect_mongodb(_config: &MongoConfig) -> Result<Self, RepoError> {
        Err(RepoError::Connection(
            "MongoDB support not compiled in (enable the `mongodb` feature)".to_string(),
        ))
    }

    #[cfg(feature = "postgres")]
    async fn connect_postgres(config: &PostgresConfig) -> Result<Self, RepoError> {
        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let conn = Database::connect(opts)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        tracing::info!("PostgreSQL connected (pool: {})", config.max_connections);

        let conn = Arc::new(conn);
        let repository = super::postgres_repo::PostgresBlogRepository::new(Arc::clone(&conn));

        Ok(Self {
            backend: StoreBackend::Postgres,
            repository: Arc::new(repository),
            connection: Connection::Postgres(conn),
        })
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect_postgres(_config: &PostgresConfig) -> Result<Self, RepoError> {
        Err(RepoError::Connection(
            "PostgreSQL support not compiled in (enable the `postgres` feature)".to_string(),
        ))
    }

    pub fn backend(&self) -> StoreBackend {
        self.backend
    }

    /// Shared handle to the repository for request handlers.
    pub fn repository(&self) -> Arc<dyn BlogRepository> {
        Arc::clone(&self.repository)
    }

    /// Close the underlying connection.
    pub async fn close(self) -> Result<(), RepoError> {
        let Self {
            backend,
            repository,
            connection,
        } = self;
        drop(repository);

        match connection {
            Connection::Memory => {}
            #[cfg(feature = "mongodb")]
            Connection::MongoDb(client) => client.shutdown().await,
            #[cfg(feature = "postgres")]
            Connection::Postgres(conn) => match Arc::try_unwrap(conn) {
                Ok(conn) => conn
                    .close()
                    .await
                    .map_err(|e| RepoError::Connection(e.to_string()))?,
                // Pool closes once the last repository handle is dropped.
                Err(_) => tracing::warn!("PostgreSQL pool still in use, not closed explicitly"),
            },
        }
        tracing::info!(%backend, "Blog store closed");
        Ok(())
    }
}
