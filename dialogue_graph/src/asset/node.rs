//! Raw, port-level nodes and lines as emitted by the authoring tool.

use serde::{Deserialize, Serialize};

use crate::check_tree::BinaryOperation;
use crate::Guid;

/// Every node kind the authoring tool can emit.
///
/// Only [`NodeKind::Npc`] and [`NodeKind::Player`] survive the build pass;
/// the rest are scaffolding for resolving checks and triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "NPC")]
    Npc,
    /// The player's own lines.
    #[serde(rename = "SELF")]
    Player,
    #[serde(rename = "PROP")]
    Property,
    #[serde(rename = "BOOLEAN_NOT")]
    BooleanNot,
    #[serde(rename = "BOOLEAN_AND")]
    BooleanAnd,
    #[serde(rename = "BOOLEAN_OR")]
    BooleanOr,
    #[serde(rename = "BOOLEAN_XOR")]
    BooleanXor,
    #[serde(rename = "BOOLEAN_NAND")]
    BooleanNand,
    #[serde(rename = "BOOLEAN_NOR")]
    BooleanNor,
    #[serde(rename = "BOOLEAN_XNOR")]
    BooleanXnor,
}

impl NodeKind {
    /// Dialogue nodes the walker can stand on.
    pub fn is_walkable(self) -> bool {
        matches!(self, NodeKind::Npc | NodeKind::Player)
    }

    /// Boolean combinator nodes, unary or binary.
    pub fn is_boolean(self) -> bool {
        self == NodeKind::BooleanNot || self.binary_operation().is_some()
    }

    /// The operation of a binary combinator node.
    pub fn binary_operation(self) -> Option<BinaryOperation> {
        match self {
            NodeKind::BooleanAnd => Some(BinaryOperation::And),
            NodeKind::BooleanOr => Some(BinaryOperation::Or),
            NodeKind::BooleanXor => Some(BinaryOperation::Xor),
            NodeKind::BooleanNand => Some(BinaryOperation::Nand),
            NodeKind::BooleanNor => Some(BinaryOperation::Nor),
            NodeKind::BooleanXnor => Some(BinaryOperation::Xnor),
            _ => None,
        }
    }
}

/// One line of dialogue before its ports are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    pub message: String,
    /// Output port leading to the successor node.
    pub next_port: Guid,
    /// Output port wired to trigger property nodes.
    pub trigger_port: Guid,
    /// Input port wired from check sources (NPC lines only).
    pub check_port: Guid,
}

impl RawLine {
    /// Create a line with freshly generated port guids.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            next_port: Guid::new(),
            trigger_port: Guid::new(),
            check_port: Guid::new(),
        }
    }

    /// Create a line with explicit port guids.
    pub fn with_ports(
        message: impl Into<String>,
        next_port: impl Into<Guid>,
        trigger_port: impl Into<Guid>,
        check_port: impl Into<Guid>,
    ) -> Self {
        Self {
            message: message.into(),
            next_port: next_port.into(),
            trigger_port: trigger_port.into(),
            check_port: check_port.into(),
        }
    }
}

/// A graph vertex as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub guid: Guid,
    pub kind: NodeKind,
    #[serde(default)]
    pub lines: Vec<RawLine>,
    /// For property nodes: the property this node stands for.
    #[serde(default)]
    pub property: Option<Guid>,
}

impl RawNode {
    /// Create a node of any kind with no lines.
    pub fn new(guid: impl Into<Guid>, kind: NodeKind) -> Self {
        Self {
            guid: guid.into(),
            kind,
            lines: Vec::new(),
            property: None,
        }
    }

    /// Create an NPC dialogue node.
    pub fn npc(guid: impl Into<Guid>) -> Self {
        Self::new(guid, NodeKind::Npc)
    }

    /// Create a player dialogue node.
    pub fn player(guid: impl Into<Guid>) -> Self {
        Self::new(guid, NodeKind::Player)
    }

    /// A property node standing for `property`.
    pub fn property(guid: impl Into<Guid>, property: impl Into<Guid>) -> Self {
        Self {
            property: Some(property.into()),
            ..Self::new(guid, NodeKind::Property)
        }
    }

    /// Append a line.
    pub fn with_line(mut self, line: RawLine) -> Self {
        self.lines.push(line);
        self
    }
}
