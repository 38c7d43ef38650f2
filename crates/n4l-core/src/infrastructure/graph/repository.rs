//! SQLite implementation of the GraphRepository
//!
//! Graph writes run in one transaction and use multi-row inserts. Reads
//! return rows in insertion order.

use async_trait::async_trait;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};
use tracing::{debug, info, warn};

use crate::domain::graph::{
    Edge, EdgeType, Graph, GraphRepository, GraphStats, InsertOutcome, Node, NodeType,
};
use crate::error::{Error, Result};
use crate::storage::{Database, DatabaseConfig};

/// Rows per multi-row INSERT; 4 binds each keeps well under SQLite's limit
const INSERT_CHUNK_ROWS: usize = 200;

/// SQLite-backed graph store
///
/// Owns its database handle; call [`SqliteGraphStore::close`] when done.
#[derive(Debug, Clone)]
pub struct SqliteGraphStore {
    db: Database,
}

impl SqliteGraphStore {
    /// Wrap an open database
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open (and initialize) the database described by `config`
    pub async fn open(config: DatabaseConfig) -> Result<Self> {
        Ok(Self::new(Database::new(config).await?))
    }

    /// Open a private in-memory store
    pub async fn in_memory() -> Result<Self> {
        Ok(Self::new(Database::in_memory().await?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Release the underlying connection
    pub async fn close(&self) {
        self.db.close().await;
    }
}

#[async_trait]
impl GraphRepository for SqliteGraphStore {
    async fn insert_graph(
        &self,
        graph: &Graph,
        graph_id: &str,
        replace_existing: bool,
    ) -> Result<InsertOutcome> {
        let mut tx = self.db.pool().begin().await?;

        let existing_nodes = count_rows(&mut tx, "nodes", graph_id).await?;
        let existing_edges = count_rows(&mut tx, "edges", graph_id).await?;
        let exists = existing_nodes > 0 || existing_edges > 0;

        if exists && !replace_existing {
            tx.rollback().await?;
            info!(graph_id = %graph_id, existing_nodes, "Graph exists, insert skipped");
            return Ok(InsertOutcome::Skipped { existing_nodes });
        }

        if exists {
            delete_rows(&mut tx, graph_id).await?;
        }
        insert_nodes(&mut tx, graph_id, graph.nodes()).await?;
        insert_edges(&mut tx, graph_id, graph.edges()).await?;
        tx.commit().await?;

        let nodes = graph.node_count();
        let edges = graph.edge_count();
        if exists {
            warn!(graph_id = %graph_id, previous_nodes = existing_nodes, nodes, edges, "Graph replaced");
            Ok(InsertOutcome::Replaced {
                previous_nodes: existing_nodes,
                nodes,
                edges,
            })
        } else {
            info!(graph_id = %graph_id, nodes, edges, "Graph inserted");
            Ok(InsertOutcome::Inserted { nodes, edges })
        }
    }

    async fn query_nodes(&self, graph_id: &str) -> Result<Vec<Node>> {
        let rows: Vec<NodeRow> = sqlx::query_as(
            "SELECT label, node_type, intent_score FROM nodes WHERE graph_id = ? ORDER BY rowid",
        )
        .bind(graph_id)
        .fetch_all(self.db.pool())
        .await?;

        debug!(graph_id = %graph_id, count = rows.len(), "Nodes loaded");
        rows.into_iter().map(|r| r.into_node()).collect()
    }

    async fn query_edges(&self, graph_id: &str) -> Result<Vec<Edge>> {
        let rows: Vec<EdgeRow> = sqlx::query_as(
            "SELECT src, dst, edge_type FROM edges WHERE graph_id = ? ORDER BY rowid",
        )
        .bind(graph_id)
        .fetch_all(self.db.pool())
        .await?;

        debug!(graph_id = %graph_id, count = rows.len(), "Edges loaded");
        rows.into_iter().map(|r| r.into_edge()).collect()
    }

    async fn list_graphs(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT graph_id FROM nodes UNION SELECT graph_id FROM edges ORDER BY graph_id",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn graph_exists(&self, graph_id: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM nodes WHERE graph_id = ? LIMIT 1")
            .bind(graph_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.is_some())
    }

    async fn delete_graph(&self, graph_id: &str) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;
        let deleted = delete_rows(&mut tx, graph_id).await?;
        tx.commit().await?;

        if deleted > 0 {
            info!(graph_id = %graph_id, rows = deleted, "Graph deleted");
        }
        Ok(deleted > 0)
    }

    async fn graph_stats(&self, graph_id: &str) -> Result<GraphStats> {
        let mut conn = self.db.pool().acquire().await?;
        Ok(GraphStats {
            node_count: count_rows(&mut conn, "nodes", graph_id).await?,
            edge_count: count_rows(&mut conn, "edges", graph_id).await?,
        })
    }
}

// `table` is always one of the two fixed table names.
async fn count_rows(conn: &mut SqliteConnection, table: &str, graph_id: &str) -> Result<u64> {
    let (count,): (i64,) =
        sqlx::query_as(&format!("SELECT COUNT(*) FROM {table} WHERE graph_id = ?"))
            .bind(graph_id)
            .fetch_one(&mut *conn)
            .await?;
    Ok(count as u64)
}

async fn delete_rows(conn: &mut SqliteConnection, graph_id: &str) -> Result<u64> {
    let nodes = sqlx::query("DELETE FROM nodes WHERE graph_id = ?")
        .bind(graph_id)
        .execute(&mut *conn)
        .await?;
    let edges = sqlx::query("DELETE FROM edges WHERE graph_id = ?")
        .bind(graph_id)
        .execute(&mut *conn)
        .await?;
    Ok(nodes.rows_affected() + edges.rows_affected())
}

async fn insert_nodes(conn: &mut SqliteConnection, graph_id: &str, nodes: &[Node]) -> Result<()> {
    for chunk in nodes.chunks(INSERT_CHUNK_ROWS) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO nodes (graph_id, label, node_type, intent_score) ");
        builder.push_values(chunk, |mut row, node| {
            row.push_bind(graph_id.to_string())
                .push_bind(node.label.clone())
                .push_bind(node.node_type.as_str())
                .push_bind(node.intent);
        });
        builder.build().execute(&mut *conn).await?;
    }
    Ok(())
}

async fn insert_edges(conn: &mut SqliteConnection, graph_id: &str, edges: &[Edge]) -> Result<()> {
    for chunk in edges.chunks(INSERT_CHUNK_ROWS) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO edges (graph_id, src, dst, edge_type) ");
        builder.push_values(chunk, |mut row, edge| {
            row.push_bind(graph_id.to_string())
                .push_bind(edge.source.clone())
                .push_bind(edge.target.clone())
                .push_bind(edge.edge_type.as_str());
        });
        builder.build().execute(&mut *conn).await?;
    }
    Ok(())
}

// ========== Row Types ==========

#[derive(FromRow)]
struct NodeRow {
    label: String,
    node_type: String,
    intent_score: f64,
}

impl NodeRow {
    fn into_node(self) -> Result<Node> {
        let node_type = NodeType::parse(&self.node_type)
            .ok_or_else(|| Error::Other(format!("Invalid node type: {}", self.node_type)))?;
        Ok(Node::new(self.label, node_type, self.intent_score))
    }
}

#[derive(FromRow)]
struct EdgeRow {
    src: String,
    dst: String,
    edge_type: String,
}

impl EdgeRow {
    fn into_edge(self) -> Result<Edge> {
        let edge_type = EdgeType::parse(&self.edge_type)
            .ok_or_else(|| Error::Other(format!("Invalid edge type: {}", self.edge_type)))?;
        Ok(Edge::new(self.src, edge_type, self.dst))
    }
}
