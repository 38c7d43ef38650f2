//! Storage layer - SQLite
//!
//! - `database`: connection pool and path resolution
//! - `schema`: idempotent table creation
//!
//! ```ignore
//! use n4l_core::storage::Database;
//!
//! let db = Database::in_memory().await?;
//! db.health_check().await?;
//! ```

pub mod database;
pub mod schema;

pub use database::{
    DEFAULT_DATA_DIR, DEFAULT_DB_FILE, Database, DatabaseConfig, IN_MEMORY, resolve_database_path,
};
pub use schema::init_schema;
