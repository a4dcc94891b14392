//! Error types for asset decoding, build options and the build pass.

use thiserror::Error;

use crate::Guid;

/// Failure to decode a compiled graph asset.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema version {found} (expected {expected})")]
    UnsupportedSchema { found: u32, expected: u32 },
}

/// Failure to decode build options.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Authoring-data integrity violations found by the build pass.
///
/// Every variant is fatal: a graph that fails to build is never exposed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("duplicate node guid {0}")]
    DuplicateNode(Guid),

    #[error("duplicate property guid {0}")]
    DuplicateProperty(Guid),

    #[error("edge {from_node}:{from_port} -> {to_node}:{to_port} references unknown node {missing}")]
    DanglingEdge {
        from_node: Guid,
        from_port: Guid,
        to_node: Guid,
        to_port: Guid,
        missing: Guid,
    },

    #[error("property node {node} references unknown property {property}")]
    UnknownProperty { node: Guid, property: Guid },

    #[error("node {node} is wired as a property but is not a property node")]
    NotAPropertyNode { node: Guid },

    #[error("line {line} of node {node} continues to {target}, which is not a dialogue node")]
    NotWalkable { node: Guid, line: usize, target: Guid },

    #[error("boolean node {node} has {found} inputs, expected {expected}")]
    MalformedBooleanNode {
        node: Guid,
        expected: usize,
        found: usize,
    },

    #[error("boolean node {node} feeds back into its own inputs")]
    CyclicCheckTree { node: Guid },

    #[error("check trees of line {line} of node {node} expand to more than {limit} leaves")]
    CheckTreeTooLarge { node: Guid, line: usize, limit: usize },

    #[error("no dialogue node without a predecessor; the graph has no start node")]
    NoStartNode,

    #[error("multiple start nodes: {candidates:?}")]
    AmbiguousStartNode { candidates: Vec<Guid> },
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
