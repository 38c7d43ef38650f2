//! Graph store implementations
//!
//! Concrete implementations of the graph repository trait using SQLite.

mod repository;

pub use repository::SqliteGraphStore;
