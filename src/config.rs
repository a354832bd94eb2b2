//! CLI configuration and argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use conx::UpgradePolicy;
use conx::json::DEFAULT_ID_FIELD;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COMMIT: &str = env!("BUILD_COMMIT");
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Connection merge and Kubernetes upgrade path toolkit.
///
/// Merges captured GraphQL connection pages the way list screens do, and
/// resolves which Kubernetes versions a cluster may upgrade to.
#[derive(Parser, Debug, Clone)]
#[command(name = "conx")]
#[command(about = "Connection merge and Kubernetes upgrade path toolkit")]
#[command(version = const_format::formatcp!(
    "{} (commit: {}, build date: {})",
    VERSION, COMMIT, BUILD_DATE
))]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn", env = "CONX_LOG_LEVEL")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Merge an incoming page into a previously held connection
    Merge {
        /// Connection currently held by the list
        previous: PathBuf,

        /// Newly fetched page (a file containing `null` means no data)
        incoming: PathBuf,

        /// Put incoming nodes at the front instead of appending
        #[arg(long, default_value = "false")]
        prepend: bool,

        /// Node field holding the identifier
        #[arg(long, default_value = DEFAULT_ID_FIELD)]
        id_field: String,
    },

    /// Remove a node from a connection
    Remove {
        connection: PathBuf,

        /// Identifier of the node to remove
        node_id: String,

        /// Node field holding the identifier
        #[arg(long, default_value = DEFAULT_ID_FIELD)]
        id_field: String,
    },

    /// Flatten a connection into its nodes
    Nodes {
        connection: PathBuf,

        /// Node field holding the identifier
        #[arg(long, default_value = DEFAULT_ID_FIELD)]
        id_field: String,
    },

    /// List supported upgrade targets for a cluster version
    Upgrades {
        /// Current cluster version (e.g., 1.28.3)
        #[arg(short, long)]
        current: Option<String>,

        /// Provider supported versions, comma separated (e.g., 1.28.5,1.29.1)
        #[arg(short, long, value_delimiter = ',')]
        supported: Vec<String>,

        /// Provider cloud (aws, gcp, azure, ...)
        #[arg(short, long, env = "CONX_PROVIDER")]
        provider: Option<String>,

        /// Maximum minor releases per upgrade
        #[arg(long, default_value = "1")]
        max_minor_step: u64,
    },

    /// Show the minor-by-minor control plane path to a target version
    Path {
        /// Current cluster version (e.g., 1.28)
        #[arg(short, long)]
        current: String,

        /// Target Kubernetes version (e.g., 1.31)
        #[arg(short, long)]
        target: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// What to run, normalized from CLI arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Merge {
        previous: PathBuf,
        incoming: PathBuf,
        prepend: bool,
        id_field: String,
    },
    Remove {
        connection: PathBuf,
        node_id: String,
        id_field: String,
    },
    Nodes {
        connection: PathBuf,
        id_field: String,
    },
    Upgrades {
        current: Option<String>,
        /// Blank entries are kept as `None`.
        supported: Vec<Option<String>>,
        provider: Option<String>,
        policy: UpgradePolicy,
    },
    Path {
        current: String,
        target: String,
    },
}

/// Application configuration derived from CLI args.
#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,
    pub output: OutputFormat,
    pub log_level: String,
}

impl Config {
    /// Create config from CLI arguments.
    pub fn from_args(args: Args) -> Self {
        let action = match args.command {
            Command::Merge {
                previous,
                incoming,
                prepend,
                id_field,
            } => Action::Merge {
                previous,
                incoming,
                prepend,
                id_field,
            },
            Command::Remove {
                connection,
                node_id,
                id_field,
            } => Action::Remove {
                connection,
                node_id,
                id_field,
            },
            Command::Nodes {
                connection,
                id_field,
            } => Action::Nodes {
                connection,
                id_field,
            },
            Command::Upgrades {
                current,
                supported,
                provider,
                max_minor_step,
            } => Action::Upgrades {
                current: non_blank(current),
                supported: supported
                    .into_iter()
                    .map(|v| non_blank(Some(v)))
                    .collect(),
                provider: non_blank(provider),
                policy: UpgradePolicy { max_minor_step },
            },
            Command::Path { current, target } => Action::Path { current, target },
        };

        Self {
            action,
            output: args.output,
            log_level: args.log_level,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
