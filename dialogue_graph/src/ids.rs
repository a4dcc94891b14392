//! Identifiers used across the dialogue graph.
//!
//! Authoring data refers to everything by string guid. The build pass turns
//! those references into dense arena handles so the walker never has to look
//! up a guid to follow an edge.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use uuid::Uuid;

/// String identifier emitted by the authoring tool for nodes, ports,
/// properties and assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(String);

impl Guid {
    /// Create a fresh random guid.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The empty guid. Authoring data uses it for "not connected".
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether this is the empty "not connected" guid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the guid text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Guid {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Guid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Guid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Guid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle of a walkable node inside a built [`DialogueGraph`](crate::DialogueGraph).
///
/// Only the build pass mints handles; they serialize for inspection but
/// cannot be decoded back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position in the graph's node arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Handle of a property inside a built [`DialogueGraph`](crate::DialogueGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PropertyId(pub(crate) u32);

impl PropertyId {
    /// Position in the graph's property table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "property#{}", self.0)
    }
}
