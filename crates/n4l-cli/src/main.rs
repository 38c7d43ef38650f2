//! N4L CLI - document to knowledge graph, and back to context

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use n4l_core::config::Config;
use n4l_core::domain::graph::{GraphRepository, InsertOutcome};
use n4l_core::extract::RelationExtractor;
use n4l_core::infrastructure::graph::SqliteGraphStore;
use n4l_core::pipeline::Pipeline;
use n4l_core::retrieval::{RetrievalConfig, Retriever};
use n4l_core::storage::{DatabaseConfig, resolve_database_path};
use tracing::debug;

#[derive(Parser)]
#[command(name = "n4l")]
#[command(author, version, about = "Build and query N4L knowledge graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file (overrides storage.db_path; relative paths live under storage.data_dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a graph from a document and store it
    Ingest {
        /// Graph identifier
        graph_id: String,
        /// Document file; reads stdin when omitted or `-`
        file: Option<PathBuf>,
        /// Leave an existing graph untouched instead of replacing it
        #[arg(long)]
        keep_existing: bool,
    },

    /// Print the relations found in a document without storing anything
    Extract {
        /// Document file; reads stdin when omitted or `-`
        file: Option<PathBuf>,
    },

    /// Retrieve context for a query from one or more stored graphs
    Query {
        /// Query text
        query: String,
        /// Graph identifier (repeat for several graphs)
        #[arg(short, long = "graph", required = true)]
        graphs: Vec<String>,
        /// Number of seed nodes
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Weight of node intent in the ranking
        #[arg(short, long)]
        intent_weight: Option<f64>,
    },

    /// Manage stored graphs
    Graphs {
        #[command(subcommand)]
        action: GraphAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum GraphAction {
    /// List stored graph identifiers
    List,
    /// Show a graph's nodes and edges
    Show { graph_id: String },
    /// Delete a stored graph
    Delete { graph_id: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let directive = if cli.quiet { "n4l_core=warn" } else { "n4l_core=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let format = cli.format;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Config { action } => cmd_config(action, quiet),

        Commands::Extract { file } => {
            let config = Config::load()?;
            cmd_extract(&config, file, format)
        }

        Commands::Ingest {
            graph_id,
            file,
            keep_existing,
        } => {
            let config = Config::load()?;
            let store = open_store(&config, cli.db).await?;
            let result =
                cmd_ingest(&store, &config, &graph_id, file, keep_existing, format, quiet).await;
            store.close().await;
            result
        }

        Commands::Query {
            query,
            graphs,
            top_k,
            intent_weight,
        } => {
            let config = Config::load()?;
            let mut retrieval = config.retrieval;
            if let Some(top_k) = top_k {
                retrieval.top_k = top_k;
            }
            if let Some(weight) = intent_weight {
                retrieval.intent_weight = weight;
            }

            let store = open_store(&config, cli.db).await?;
            let result = cmd_query(Arc::clone(&store), retrieval, &query, &graphs, format).await;
            store.close().await;
            result
        }

        Commands::Graphs { action } => {
            let config = Config::load()?;
            let store = open_store(&config, cli.db).await?;
            let result = cmd_graphs(&store, action, format, quiet).await;
            store.close().await;
            result
        }
    }
}

fn database_config(config: &Config, db: Option<PathBuf>) -> DatabaseConfig {
    match db {
        Some(path) => {
            DatabaseConfig::with_path(resolve_database_path(path, &config.storage.data_dir))
        }
        None => config.database_config(),
    }
}

async fn open_store(config: &Config, db: Option<PathBuf>) -> anyhow::Result<Arc<SqliteGraphStore>> {
    let db_config = database_config(config, db);
    debug!(path = %db_config.path.display(), "Opening graph store");
    Ok(Arc::new(SqliteGraphStore::open(db_config).await?))
}

fn read_document(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_ingest(
    store: &SqliteGraphStore,
    config: &Config,
    graph_id: &str,
    file: Option<PathBuf>,
    keep_existing: bool,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let text = read_document(file)?;
    let pipeline = Pipeline::from_config(&config.extraction, config.intent)?;
    let graph = pipeline.build(&text);

    let outcome = store.insert_graph(&graph, graph_id, !keep_existing).await?;

    if format == OutputFormat::Json {
        let json = serde_json::json!({ "graph_id": graph_id, "result": outcome });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    match outcome {
        InsertOutcome::Inserted { nodes, edges } => {
            println!("Stored graph '{}': {} nodes, {} edges", graph_id, nodes, edges);
        }
        InsertOutcome::Replaced {
            previous_nodes,
            nodes,
            edges,
        } => {
            println!(
                "Replaced graph '{}' ({} previous nodes): {} nodes, {} edges",
                graph_id, previous_nodes, nodes, edges
            );
        }
        InsertOutcome::Skipped { existing_nodes } => {
            println!(
                "Graph '{}' already exists with {} nodes; left unchanged.",
                graph_id, existing_nodes
            );
        }
    }
    Ok(())
}

fn cmd_extract(config: &Config, file: Option<PathBuf>, format: OutputFormat) -> anyhow::Result<()> {
    let text = read_document(file)?;
    let extractor = RelationExtractor::new(&config.extraction)?;
    let relations = extractor.extract(&text);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&relations)?),
        OutputFormat::Text => {
            for r in &relations {
                println!(
                    "{} ({}) --{}--> {} ({})",
                    r.source, r.source_kind, r.relation, r.target, r.target_kind
                );
            }
        }
    }
    Ok(())
}

async fn cmd_query(
    store: Arc<SqliteGraphStore>,
    config: RetrievalConfig,
    query: &str,
    graphs: &[String],
    format: OutputFormat,
) -> anyhow::Result<()> {
    config.validate()?;
    let retriever = Retriever::with_config(store, config);

    if let [graph_id] = graphs {
        let retrieval = retriever.retrieve(query, graph_id).await?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&retrieval)?),
            OutputFormat::Text => println!("{}", retrieval.context),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let mut results = serde_json::Map::new();
            for graph_id in graphs {
                let retrieval = retriever.retrieve(query, graph_id).await?;
                results.insert(graph_id.clone(), serde_json::to_value(retrieval)?);
            }
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Text => println!("{}", retriever.retrieve_many(query, graphs).await?),
    }
    Ok(())
}

async fn cmd_graphs(
    store: &SqliteGraphStore,
    action: GraphAction,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    match action {
        GraphAction::List => {
            let graphs = store.list_graphs().await?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&graphs)?);
            } else if graphs.is_empty() {
                if !quiet {
                    println!("No graphs stored.");
                    println!("\nCreate one with: n4l ingest <graph-id> <file>");
                }
            } else {
                for graph_id in graphs {
                    println!("{}", graph_id);
                }
            }
        }
        GraphAction::Show { graph_id } => {
            if !store.graph_exists(&graph_id).await? {
                return Err(n4l_core::Error::GraphNotFound(graph_id).into());
            }
            let graph = store.load_graph(&graph_id).await?;

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&graph.to_records())?);
                return Ok(());
            }

            let stats = store.graph_stats(&graph_id).await?;
            println!(
                "Graph '{}': {} nodes, {} edges",
                graph_id, stats.node_count, stats.edge_count
            );
            println!("\nNodes:");
            for node in graph.nodes() {
                println!("  {} [{}] intent={:.3e}", node.label, node.node_type, node.intent);
            }
            println!("\nEdges:");
            for edge in graph.edges() {
                println!("  {} --{}--> {}", edge.source, edge.edge_type, edge.target);
            }
        }
        GraphAction::Delete { graph_id } => {
            let deleted = store.delete_graph(&graph_id).await?;
            if !deleted {
                return Err(n4l_core::Error::GraphNotFound(graph_id).into());
            }
            if !quiet {
                println!("Deleted graph '{}'", graph_id);
            }
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_query_requires_graph() {
        assert!(Cli::try_parse_from(["n4l", "query", "spreads"]).is_err());

        let cli = Cli::try_parse_from(["n4l", "query", "spreads", "-g", "a", "-g", "b", "-k", "2"])
            .unwrap();
        match cli.command {
            Commands::Query { graphs, top_k, .. } => {
                assert_eq!(graphs, vec!["a", "b"]);
                assert_eq!(top_k, Some(2));
            }
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_db_flag_resolves_under_data_dir() {
        let mut config = Config::default();
        config.storage.data_dir = "graphs-data".to_string();

        let relative = database_config(&config, Some(PathBuf::from("x.db")));
        assert_eq!(relative.path, PathBuf::from("graphs-data").join("x.db"));

        let absolute = std::env::temp_dir().join("x.db");
        assert_eq!(database_config(&config, Some(absolute.clone())).path, absolute);

        assert!(database_config(&config, Some(PathBuf::from(":memory:"))).is_in_memory());
        assert_eq!(
            database_config(&config, None).path,
            PathBuf::from("graphs-data").join("n4l.db")
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["n4l", "graphs", "list", "--format", "json", "--db", "x.db"])
            .unwrap();
        assert!(cli.format == OutputFormat::Json);
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
    }
}
