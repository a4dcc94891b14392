//! Compiled graph assets - the ingest payload handed over by the authoring tool.
//!
//! An asset is flat: nodes, port-level edges and properties, all cross-referenced
//! by string guid. Nothing here is resolved; that is the build pass's job.

mod node;

pub use node::*;

use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::{Guid, Property};

/// A raw port-level connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from_node: Guid,
    pub from_port: Guid,
    pub to_node: Guid,
    pub to_port: Guid,
}

impl Edge {
    /// Create an edge between two ports.
    pub fn new(
        from_node: impl Into<Guid>,
        from_port: impl Into<Guid>,
        to_node: impl Into<Guid>,
        to_port: impl Into<Guid>,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            from_port: from_port.into(),
            to_node: to_node.into(),
            to_port: to_port.into(),
        }
    }
}

/// The complete, unresolved dialogue graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphAsset {
    #[serde(default = "GraphAsset::current_schema")]
    pub schema_version: u32,
    pub asset_guid: Guid,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl GraphAsset {
    /// Schema version written by this crate.
    pub const SCHEMA_VERSION: u32 = 1;

    fn current_schema() -> u32 {
        Self::SCHEMA_VERSION
    }

    /// Create an empty asset.
    pub fn new(asset_guid: impl Into<Guid>) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION,
            asset_guid: asset_guid.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Decode an asset from JSON, rejecting unknown schema versions.
    pub fn from_json_str(json: &str) -> Result<Self, AssetError> {
        let asset: GraphAsset = serde_json::from_str(json)?;
        if asset.schema_version != Self::SCHEMA_VERSION {
            return Err(AssetError::UnsupportedSchema {
                found: asset.schema_version,
                expected: Self::SCHEMA_VERSION,
            });
        }
        Ok(asset)
    }

    /// Encode the asset as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, AssetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a node.
    pub fn with_node(mut self, node: RawNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a property.
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Add an edge.
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Find a raw node by guid.
    pub fn node(&self, guid: &str) -> Option<&RawNode> {
        self.nodes.iter().find(|n| n.guid.as_str() == guid)
    }
}
