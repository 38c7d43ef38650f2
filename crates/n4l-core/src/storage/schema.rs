//! Table definitions
//!
//! Two flat tables keyed by `graph_id`. There are no constraints or foreign
//! keys; rows are only ever appended or deleted per graph.

use sqlx::SqlitePool;

use crate::error::Result;

const CREATE_NODES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS nodes (
        graph_id TEXT NOT NULL,
        label TEXT NOT NULL,
        node_type TEXT NOT NULL,
        intent_score REAL NOT NULL
    );
"#;

const CREATE_EDGES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS edges (
        graph_id TEXT NOT NULL,
        src TEXT NOT NULL,
        dst TEXT NOT NULL,
        edge_type TEXT NOT NULL
    );
"#;

/// Create the tables if they do not exist yet
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_NODES_TABLE).execute(pool).await?;
    sqlx::query(CREATE_EDGES_TABLE).execute(pool).await?;
    Ok(())
}
