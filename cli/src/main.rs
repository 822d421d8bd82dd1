//! learngraph CLI: command-line interface for a running learngraph server
//!
//! Uses the learngraph-sdk RemoteClient to talk to the HTTP API.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use learngraph_sdk::{
    LearnGraphClient, NewEdge, NewNode, PropertyMap, PropertyValue, RemoteClient,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "learngraph-cli", version, about = "learngraph knowledge graph CLI")]
struct Cli {
    /// Server HTTP URL
    #[arg(long, default_value = "http://localhost:5000", global = true, env = "LEARNGRAPH_URL")]
    url: String,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Get server status
    Status,
    /// Show graph statistics
    Stats {
        /// Number of most connected topics to list
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Show what to learn next
    Recommend {
        /// Maximum number of recommendations
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Add a topic (or update an existing one)
    AddNode {
        /// Topic name
        id: String,

        /// Topic type: concept, resource, project, skill
        #[arg(long = "type", short = 't')]
        kind: Option<String>,

        /// Property as key=value; values that parse as JSON keep their type
        #[arg(long = "prop", short = 'p')]
        properties: Vec<String>,
    },
    /// Connect two topics
    AddEdge {
        source: String,
        target: String,

        /// prerequisite, related_to, uses, learned_from
        #[arg(long, short)]
        relationship: Option<String>,

        #[arg(long, short)]
        weight: Option<f64>,
    },
    /// Remove a topic and its connections
    RemoveNode { id: String },
    /// Remove the connection between two topics
    RemoveEdge { source: String, target: String },
    /// Show the topics around one topic
    Neighbors { id: String },
    /// Shortest path between two topics
    Path { source: String, target: String },
    /// Prerequisites to study before a topic, in order
    LearningPath { id: String },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = RemoteClient::new(&cli.url);

    let result = run(&client, cli.command, &cli.format).await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(client: &RemoteClient, command: Commands, format: &OutputFormat) -> CliResult {
    match command {
        Commands::Status => run_status(client, format).await,
        Commands::Stats { top } => run_stats(client, top, format).await,
        Commands::Recommend { limit } => run_recommend(client, limit, format).await,
        Commands::AddNode {
            id,
            kind,
            properties,
        } => {
            let mut node = NewNode::new(id);
            node.kind = kind;
            node.properties = parse_properties(&properties)?;
            print_message(&client.add_node(node).await?, format)
        }
        Commands::AddEdge {
            source,
            target,
            relationship,
            weight,
        } => {
            let mut edge = NewEdge::new(source, target);
            edge.relationship = relationship;
            edge.weight = weight;
            print_message(&client.add_edge(edge).await?, format)
        }
        Commands::RemoveNode { id } => print_message(&client.remove_node(&id).await?, format),
        Commands::RemoveEdge { source, target } => {
            print_message(&client.remove_edge(&source, &target).await?, format)
        }
        Commands::Neighbors { id } => {
            let neighbors = client.neighbors(&id).await?;
            match format {
                OutputFormat::Json => print_json(&neighbors),
                OutputFormat::Table => {
                    let mut table = new_table(&["direction", "topic"]);
                    for id in &neighbors.successors {
                        table.add_row(vec!["out", id.as_str()]);
                    }
                    for id in &neighbors.predecessors {
                        table.add_row(vec!["in", id.as_str()]);
                    }
                    println!("{}", table);
                    Ok(())
                }
            }
        }
        Commands::Path { source, target } => {
            let response = client.find_path(&source, &target).await?;
            match format {
                OutputFormat::Json => print_json(&response),
                OutputFormat::Table => {
                    match response.path {
                        Some(path) => println!("{}", join_ids(&path)),
                        None => println!("No path from {} to {}", source, target),
                    }
                    Ok(())
                }
            }
        }
        Commands::LearningPath { id } => {
            let response = client.learning_path(&id).await?;
            match format {
                OutputFormat::Json => print_json(&response),
                OutputFormat::Table => {
                    let mut table = new_table(&["step", "topic"]);
                    for (step, topic) in response.path.iter().enumerate() {
                        table.add_row(vec![(step + 1).to_string(), topic.to_string()]);
                    }
                    println!("{}", table);
                    Ok(())
                }
            }
        }
    }
}

async fn run_status(client: &RemoteClient, format: &OutputFormat) -> CliResult {
    let status = client.status().await?;

    match format {
        OutputFormat::Json => print_json(&status),
        OutputFormat::Table => {
            println!("Status:  {}", status.status);
            println!("Version: {}", status.version);
            println!("Nodes:   {}", status.storage.nodes);
            println!("Edges:   {}", status.storage.edges);
            Ok(())
        }
    }
}

async fn run_stats(client: &RemoteClient, top: usize, format: &OutputFormat) -> CliResult {
    let stats = client.stats(top).await?;

    match format {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Table => {
            println!("Topics:      {}", stats.total_nodes);
            println!("Connections: {}", stats.total_edges);
            println!("Clusters:    {}", stats.components);
            println!("Density:     {:.3}", stats.density);

            let mut types = new_table(&["type", "count"]);
            for (kind, count) in &stats.node_types {
                types.add_row(vec![kind.clone(), count.to_string()]);
            }
            println!("{}", types);

            let mut connected = new_table(&["topic", "connections"]);
            for entry in &stats.most_connected {
                connected.add_row(vec![entry.node.to_string(), entry.connections.to_string()]);
            }
            println!("{}", connected);
            Ok(())
        }
    }
}

async fn run_recommend(
    client: &RemoteClient,
    limit: Option<usize>,
    format: &OutputFormat,
) -> CliResult {
    let recommendations = client.recommendations(limit).await?;

    match format {
        OutputFormat::Json => print_json(&recommendations),
        OutputFormat::Table => {
            if recommendations.is_empty() {
                println!("(no recommendations)");
                return Ok(());
            }

            let mut table = new_table(&["topic", "score", "strategy", "reason"]);
            for rec in &recommendations {
                table.add_row(vec![
                    rec.node.to_string(),
                    format!("{:.1}", rec.score),
                    rec.strategy.to_string(),
                    rec.reason.clone(),
                ]);
            }
            println!("{}", table);
            println!("{} recommendation(s)", recommendations.len());
            Ok(())
        }
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_message(response: &learngraph_sdk::MutationResponse, format: &OutputFormat) -> CliResult {
    match format {
        OutputFormat::Json => print_json(response),
        OutputFormat::Table => {
            println!("{}", response.message);
            Ok(())
        }
    }
}

fn join_ids(ids: &[learngraph_sdk::NodeId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Parse `key=value` pairs. Values that are valid JSON (numbers, booleans,
/// arrays) keep their type; anything else is a string.
fn parse_properties(pairs: &[String]) -> Result<PropertyMap, String> {
    let mut properties = PropertyMap::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| format!("Property '{}' must look like key=value", pair))?;
        let value = serde_json::from_str::<serde_json::Value>(raw)
            .map(|v| PropertyValue::from_json(&v))
            .unwrap_or_else(|_| PropertyValue::from(raw));
        properties.insert(key.trim().to_string(), value);
    }
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties() {
        let props = parse_properties(&[
            "level=beginner".to_string(),
            "hours=12".to_string(),
            "done=false".to_string(),
            "url=https://example.com/?a=b".to_string(),
        ])
        .unwrap();

        assert_eq!(props["level"].as_string(), Some("beginner"));
        assert_eq!(props["hours"].as_integer(), Some(12));
        assert_eq!(props["done"].as_boolean(), Some(false));
        assert_eq!(props["url"].as_string(), Some("https://example.com/?a=b"));
    }

    #[test]
    fn test_parse_properties_rejects_missing_equals() {
        assert!(parse_properties(&["level".to_string()]).is_err());
    }

    #[test]
    fn test_join_ids() {
        let ids = vec![
            learngraph_sdk::NodeId::new("Python"),
            learngraph_sdk::NodeId::new("Flask"),
        ];
        assert_eq!(join_ids(&ids), "Python -> Flask");
    }
}
