//! Cursor-paginated connection merging.
//!
//! List screens hold a [`Connection`] and replace it with the result of a
//! merge each time a page or a mutation result arrives. Merges never drop a
//! node they have seen and never hold two edges for the same node id.
//!
//! The wire shape tolerates `null` almost everywhere (`edges`, individual
//! edges, nodes, `pageInfo`). Those nulls are normalized away when a
//! connection is deserialized, so everything here works on a fully typed
//! value. A single edge or node that does not decode is skipped with a
//! warning; the rest of the page is kept.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// A value with a unique, stable identifier.
pub trait Node {
    fn node_id(&self) -> &str;
}

/// Pagination state of the most recently fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub end_cursor: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_next_page: bool,
}

impl PageInfo {
    pub fn new(end_cursor: impl Into<String>, has_next_page: bool) -> Self {
        Self {
            end_cursor: Some(end_cursor.into()),
            has_next_page,
        }
    }
}

/// A node plus its per-edge cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge<N> {
    pub node: N,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl<N> Edge<N> {
    pub fn new(node: N) -> Self {
        Self { node, cursor: None }
    }
}

/// An ordered, deduplicated page set with the latest pagination state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(from = "RawConnection")]
#[serde(bound(deserialize = "N: DeserializeOwned"))]
pub struct Connection<N> {
    pub edges: Vec<Edge<N>>,
    pub page_info: PageInfo,
}

impl<N> Default for Connection<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<N> Connection<N> {
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
        }
    }

    /// Build a connection from bare nodes, in order.
    pub fn from_nodes(nodes: impl IntoIterator<Item = N>, page_info: PageInfo) -> Self {
        Self {
            edges: nodes.into_iter().map(Edge::new).collect(),
            page_info,
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Borrow the nodes in order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.edges.iter().map(|edge| &edge.node)
    }

    /// Map every node, dropping the ones `f` rejects. Edge cursors and page
    /// info are kept.
    pub fn filter_map_nodes<M>(self, mut f: impl FnMut(N) -> Option<M>) -> Connection<M> {
        Connection {
            edges: self
                .edges
                .into_iter()
                .filter_map(|edge| {
                    f(edge.node).map(|node| Edge {
                        node,
                        cursor: edge.cursor,
                    })
                })
                .collect(),
            page_info: self.page_info,
        }
    }
}

impl<N: Node> Connection<N> {
    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes().any(|node| node.node_id() == node_id)
    }

    /// Node ids in order.
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes().map(Node::node_id).collect()
    }
}

/// Append a freshly fetched page ("load more").
///
/// Previous edges come first. A node that shows up again in `incoming` keeps
/// its original position. Page info is taken from `incoming`. With no
/// incoming page, `previous` is returned unchanged.
pub fn merge_append<N: Node>(
    previous: Connection<N>,
    incoming: Option<Connection<N>>,
) -> Connection<N> {
    let Some(incoming) = incoming else {
        return previous;
    };

    let total = previous.len() + incoming.len();
    let edges = dedupe_keep_first(previous.edges.into_iter().chain(incoming.edges), total);
    debug!("Appended page: {} edges in, {} kept", total, edges.len());

    Connection {
        edges,
        page_info: incoming.page_info,
    }
}

/// Put newly created or edited nodes at the front ("item created").
///
/// A stale copy of an incoming node is removed from its old position. Page
/// info stays with `previous`, since a mutation result does not move the
/// server-side cursor.
pub fn merge_prepend<N: Node>(
    previous: Connection<N>,
    incoming: Option<Connection<N>>,
) -> Connection<N> {
    let Some(incoming) = incoming else {
        return previous;
    };

    let total = previous.len() + incoming.len();
    let edges = dedupe_keep_first(incoming.edges.into_iter().chain(previous.edges), total);
    debug!("Prepended: {} edges in, {} kept", total, edges.len());

    Connection {
        edges,
        page_info: previous.page_info,
    }
}

/// Prepend a single node.
pub fn prepend_node<N: Node>(connection: Connection<N>, node: N) -> Connection<N> {
    merge_prepend(
        connection,
        Some(Connection::from_nodes([node], PageInfo::default())),
    )
}

/// Drop the edge holding `node_id`. Unchanged if no such node is present.
pub fn remove_node<N: Node>(connection: Connection<N>, node_id: &str) -> Connection<N> {
    Connection {
        edges: connection
            .edges
            .into_iter()
            .filter(|edge| edge.node.node_id() != node_id)
            .collect(),
        page_info: connection.page_info,
    }
}

/// Swap in an updated copy of a node at its current position. Unchanged if
/// the node is not present.
pub fn replace_node<N: Node>(connection: Connection<N>, node: N) -> Connection<N> {
    let mut replacement = Some(node);
    let edges = connection
        .edges
        .into_iter()
        .map(|edge| {
            let matches = replacement
                .as_ref()
                .is_some_and(|n| n.node_id() == edge.node.node_id());
            match replacement.take_if(|_| matches) {
                Some(node) => Edge {
                    node,
                    cursor: edge.cursor,
                },
                None => edge,
            }
        })
        .collect();

    Connection {
        edges,
        page_info: connection.page_info,
    }
}

/// Copy the nodes out into a new vector.
pub fn to_nodes<N: Clone>(connection: &Connection<N>) -> Vec<N> {
    connection.nodes().cloned().collect()
}

/// Consume the connection and return its nodes.
pub fn into_nodes<N>(connection: Connection<N>) -> Vec<N> {
    connection.edges.into_iter().map(|edge| edge.node).collect()
}

fn dedupe_keep_first<N: Node>(
    edges: impl Iterator<Item = Edge<N>>,
    capacity: usize,
) -> Vec<Edge<N>> {
    let mut seen = HashSet::with_capacity(capacity);
    edges
        .filter(|edge| seen.insert(edge.node.node_id().to_string()))
        .collect()
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConnection {
    edges: Option<Vec<Value>>,
    page_info: Option<PageInfo>,
}

#[derive(Deserialize)]
struct RawEdge {
    node: Option<Value>,
    cursor: Option<String>,
}

impl<N: DeserializeOwned> From<RawConnection> for Connection<N> {
    fn from(raw: RawConnection) -> Self {
        let edges = raw
            .edges
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| decode_edge(index, value))
            .collect();

        Self {
            edges,
            page_info: raw.page_info.unwrap_or_default(),
        }
    }
}

/// Decode one edge, skipping it when the edge or its node is null or does
/// not match the node type.
fn decode_edge<N: DeserializeOwned>(index: usize, value: Value) -> Option<Edge<N>> {
    if value.is_null() {
        return None;
    }

    let edge: RawEdge = match serde_json::from_value(value) {
        Ok(edge) => edge,
        Err(e) => {
            warn!("Skipping malformed edge #{}: {}", index, e);
            return None;
        }
    };

    match serde_json::from_value(edge.node?) {
        Ok(node) => Some(Edge {
            node,
            cursor: edge.cursor,
        }),
        Err(e) => {
            warn!("Skipping malformed node in edge #{}: {}", index, e);
            None
        }
    }
}
