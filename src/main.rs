//! learngraph server
//!
//! `learngraph serve` runs the dashboard; the other subcommands work on the
//! data file directly without a running server.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use learngraph::config::AppConfig;
use learngraph::logging::init_logging;
use learngraph::{
    AppState, GraphDocument, GraphVisualizer, HttpServer, JsonStore, KnowledgeGraph,
    RecommendationEngine,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "learngraph", version, about = "Personal knowledge graph and learning tracker")]
struct Cli {
    /// YAML configuration file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// JSON data file (overrides config and environment)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard and API server
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long, short)]
        port: Option<u16>,

        /// Start empty instead of with example topics when no data file exists
        #[arg(long)]
        no_seed: bool,
    },
    /// Print graph statistics
    Stats {
        /// Number of most connected topics to list
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Print learning recommendations
    Recommend {
        /// Maximum number of recommendations
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Write the graph to stdout
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Json,
    Cytoscape,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(data_file) = cli.data_file {
        config.storage.data_file = data_file;
    }

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
        no_seed: false,
    }) {
        Commands::Serve {
            host,
            port,
            no_seed,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if no_seed {
                config.storage.seed_example_data = false;
            }
            serve(config).await
        }
        Commands::Stats { top } => {
            let graph = load_graph(&config)?;
            println!("{}", serde_json::to_string_pretty(&graph.statistics(top))?);
            Ok(())
        }
        Commands::Recommend { limit } => {
            let graph = load_graph(&config)?;
            let limit = config.recommendations.clamp(limit);
            let recommendations = RecommendationEngine::new(&graph).recommend(limit);
            println!("{}", serde_json::to_string_pretty(&recommendations)?);
            Ok(())
        }
        Commands::Export { format } => {
            let graph = load_graph(&config)?;
            let output = match format {
                ExportFormat::Json => serde_json::to_string_pretty(&GraphDocument::from_graph(&graph))?,
                ExportFormat::Cytoscape => {
                    serde_json::to_string_pretty(&GraphVisualizer::new(&graph).export_cytoscape())?
                }
            };
            println!("{}", output);
            Ok(())
        }
    }
}

fn load_graph(config: &AppConfig) -> Result<KnowledgeGraph> {
    let store = JsonStore::new(&config.storage.data_file);
    store
        .load_or_seed(config.storage.seed_example_data)
        .with_context(|| format!("loading {}", config.storage.data_file.display()))
}

async fn serve(config: AppConfig) -> Result<()> {
    info!("learngraph v{}", learngraph::version());

    let graph = load_graph(&config)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Graph ready"
    );

    let store = JsonStore::new(&config.storage.data_file);
    let state = AppState::new(graph, store, config.recommendations.clone());
    HttpServer::new(state, config.server.address())
        .start()
        .await
        .context("running HTTP server")
}
