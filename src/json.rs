//! Loading connections captured as raw GraphQL JSON.
//!
//! Nodes are kept as arbitrary JSON objects. The id is read from a
//! configurable field; nodes without a usable id are dropped here so the
//! merge functions never see them.

use std::fs;
use std::path::Path;

use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::connection::{Connection, Node};
use crate::error::ConxError;

/// Default node field holding the identifier.
pub const DEFAULT_ID_FIELD: &str = "id";

/// A JSON object node with its extracted id.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonNode {
    id: String,
    value: Value,
}

impl JsonNode {
    /// Wrap `value` if `id_field` holds a non-empty string or a number.
    ///
    /// Ids follow GraphQL `ID` semantics: a number is rendered as its decimal
    /// text, so `1` and `"1"` name the same node and merges dedupe them.
    pub fn from_value(value: Value, id_field: &str) -> Option<Self> {
        let id = match value.get(id_field)? {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(Self { id, value })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

}

impl Node for JsonNode {
    fn node_id(&self) -> &str {
        &self.id
    }
}

impl Serialize for JsonNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

/// Parse connection JSON. A top-level `null` means "no data" and yields
/// `None`.
pub fn parse_connection(
    content: &str,
    id_field: &str,
    source: &str,
) -> Result<Option<Connection<JsonNode>>, ConxError> {
    let document: Value = serde_json::from_str(content).map_err(|e| ConxError::json(source, e))?;
    if !(document.is_null() || document.is_object()) {
        return Err(ConxError::InvalidConnection(format!(
            "{} holds a JSON {}, expected an object or null",
            source,
            json_kind(&document)
        )));
    }

    let raw: Option<Connection<Value>> =
        serde_json::from_value(document).map_err(|e| ConxError::json(source, e))?;

    Ok(raw.map(|connection| {
        connection.filter_map_nodes(|value| {
            let node = JsonNode::from_value(value, id_field);
            if node.is_none() {
                warn!(
                    "Dropping node without a usable '{}' field in {}",
                    id_field, source
                );
            }
            node
        })
    }))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read and parse a connection file.
pub fn load_connection<P: AsRef<Path>>(
    path: P,
    id_field: &str,
) -> Result<Option<Connection<JsonNode>>, ConxError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|e| ConxError::io(&display, e))?;
    parse_connection(&content, id_field, &display)
}
