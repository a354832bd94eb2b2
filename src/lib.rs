//! conx - cursor connection merging and Kubernetes upgrade path resolution.
//!
//! Two independent, side-effect-free pieces behind an admin console's list
//! screens:
//! - [`connection`]: merge paginated GraphQL connections without duplicates
//! - [`upgrade`]: work out which Kubernetes versions a cluster may move to

pub mod connection;
pub mod error;
pub mod json;
pub mod provider;
pub mod upgrade;
pub mod version;

pub use connection::{
    Connection, Edge, Node, PageInfo, into_nodes, merge_append, merge_prepend, prepend_node,
    remove_node, replace_node, to_nodes,
};
pub use error::ConxError;
pub use provider::CloudProvider;
pub use upgrade::{
    UpgradePolicy, UpgradeSummary, next_supported_version, supported_upgrades,
    to_provider_supported_version, upgrade_path,
};
pub use version::coerce_version;
