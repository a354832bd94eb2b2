//! conx - connection merge and Kubernetes upgrade path CLI.
//!
//! Operator tool over the `conx` library:
//! - Merge captured GraphQL connection pages (append or prepend)
//! - Remove or flatten nodes of a connection
//! - List supported upgrade targets and the next version for a provider
//! - Show the minor-by-minor control plane upgrade path

mod config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};

use config::{Action, Args, Config};
use conx::json::load_connection;
use conx::{UpgradeSummary, into_nodes, merge_append, merge_prepend, remove_node, upgrade_path};

fn main() {
    let args = Args::parse();
    let config = Config::from_args(args);

    // Initialize logging
    if let Err(e) = init_tracing(&config.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    debug!("Starting conx");

    if let Err(e) = run(&config) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(config: &Config) -> Result<()> {
    match &config.action {
        Action::Merge {
            previous,
            incoming,
            prepend,
            id_field,
        } => {
            let held = load_connection(previous, id_field)?.unwrap_or_default();
            let page = load_connection(incoming, id_field)?;
            if page.is_none() {
                info!("No incoming data in {}, keeping previous", incoming.display());
            }

            let merged = if *prepend {
                merge_prepend(held, page)
            } else {
                merge_append(held, page)
            };
            output::print_connection(&merged, config.output)
        }
        Action::Remove {
            connection,
            node_id,
            id_field,
        } => {
            let held = load_connection(connection, id_field)?.unwrap_or_default();
            if !held.contains(node_id) {
                warn!("Node {} not found in {}", node_id, connection.display());
            }
            output::print_connection(&remove_node(held, node_id), config.output)
        }
        Action::Nodes {
            connection,
            id_field,
        } => {
            let held = load_connection(connection, id_field)?.unwrap_or_default();
            output::print_nodes(&into_nodes(held))
        }
        Action::Upgrades {
            current,
            supported,
            provider,
            policy,
        } => {
            let summary =
                UpgradeSummary::new(current.as_deref(), supported, provider.as_deref(), policy);
            output::print_upgrades(&summary, config.output)
        }
        Action::Path { current, target } => {
            let path = upgrade_path(current, target)
                .with_context(|| format!("Cannot plan upgrade {} -> {}", current, target))?;
            output::print_upgrade_path(current, target, &path, config.output)
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to initialize log filter: {}", e))?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
