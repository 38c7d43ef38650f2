//! SQLite database handle
//!
//! One pool per store, sized to a single connection: the store assumes a
//! single writer per database file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::debug;

use crate::error::Result;
use crate::storage::schema;

/// Path value that selects a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Default database file name, resolved under the data directory
pub const DEFAULT_DB_FILE: &str = "n4l.db";

/// Default data directory for relative database paths
pub const DEFAULT_DATA_DIR: &str = "data";

/// Database configuration options
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`
    pub path: PathBuf,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Whether to create the schema on connect
    pub auto_init: bool,
    /// Journal mode
    pub journal_mode: SqliteJournalMode,
    /// Synchronous mode
    pub synchronous: SqliteSynchronous,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: resolve_database_path(DEFAULT_DB_FILE, DEFAULT_DATA_DIR),
            max_connections: 1,
            auto_init: true,
            journal_mode: SqliteJournalMode::Wal,
            synchronous: SqliteSynchronous::Normal,
        }
    }
}

impl DatabaseConfig {
    /// Create a config for an already resolved path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create a config for an in-memory database
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(IN_MEMORY),
            journal_mode: SqliteJournalMode::Memory,
            ..Default::default()
        }
    }

    /// Set the maximum number of connections
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Skip schema creation on connect
    pub fn no_init(mut self) -> Self {
        self.auto_init = false;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        is_in_memory(&self.path)
    }
}

fn is_in_memory(path: &Path) -> bool {
    path.as_os_str() == IN_MEMORY
}

/// Resolve a configured database path
///
/// `:memory:` and absolute paths are kept as given; relative paths are
/// placed under `data_dir`.
pub fn resolve_database_path(db_path: impl AsRef<Path>, data_dir: impl AsRef<Path>) -> PathBuf {
    let db_path = db_path.as_ref();
    if is_in_memory(db_path) || db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        data_dir.as_ref().join(db_path)
    }
}

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    config: DatabaseConfig,
}

impl Database {
    /// Open a database, creating its directory and schema as needed
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let in_memory = config.is_in_memory();

        if !in_memory {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let base_options = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            SqliteConnectOptions::new().filename(&config.path)
        };
        let connect_options = base_options
            .journal_mode(config.journal_mode)
            .synchronous(config.synchronous)
            .create_if_missing(true);

        // An in-memory database lives only as long as its connection.
        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(connect_options).await?;

        debug!(path = %config.path.display(), "Opened database");

        let db = Self { pool, config };
        if db.config.auto_init {
            db.init_schema().await?;
        }

        Ok(db)
    }

    /// Create an in-memory database
    pub async fn in_memory() -> Result<Self> {
        Self::new(DatabaseConfig::in_memory()).await
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the database configuration
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Create the node and edge tables if missing
    pub async fn init_schema(&self) -> Result<()> {
        schema::init_schema(&self.pool).await
    }

    /// Check if database is healthy
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Close the database connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}
