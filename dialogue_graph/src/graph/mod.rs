//! Built dialogue graphs - the frozen, walkable form of an asset.
//!
//! A [`DialogueGraph`] only exists after a successful build. It holds the
//! dialogue nodes in an arena addressed by [`NodeId`], with every line's
//! successor, triggers and checks already resolved to handles. It is never
//! mutated afterwards and can be shared by any number of conversations.

mod builder;

pub use builder::*;

use serde::Serialize;
use std::collections::HashMap;

use crate::check_tree::{evaluate_all, CheckResolver, CheckTree, LineContext};
use crate::error::BuildResult;
use crate::{GraphAsset, Guid, NodeId, Property, PropertyId, PropertyType};

/// Who speaks a dialogue node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Speaker {
    Npc,
    Player,
}

/// A resolved line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationLine {
    pub message: String,
    /// Successor node; `None` ends the conversation.
    pub next: Option<NodeId>,
    /// Trigger properties fired, in order, when the line is chosen.
    pub triggers: Vec<PropertyId>,
    /// Checks wired directly from property nodes.
    pub checks: Vec<PropertyId>,
    /// One tree per check-port edge.
    pub check_trees: Vec<CheckTree>,
}

impl ConversationLine {
    /// Whether any check is wired to this line.
    pub fn has_checks(&self) -> bool {
        !self.check_trees.is_empty() || !self.checks.is_empty()
    }

    /// Whether the line may be selected.
    ///
    /// All check trees must pass and every tree is evaluated. Lines carrying
    /// only a flat check list fall back to its conjunction. No checks passes.
    pub fn passes<R>(&self, resolver: &mut R, context: &LineContext<'_>) -> bool
    where
        R: CheckResolver + ?Sized,
    {
        if self.check_trees.is_empty() {
            return evaluate_all(&self.checks, resolver, context);
        }

        self.check_trees
            .iter()
            .fold(true, |passed, tree| tree.evaluate(resolver, context) && passed)
    }
}

/// A walkable dialogue node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub guid: Guid,
    pub speaker: Speaker,
    /// A node leading here. Only used to find the start node.
    pub previous: Option<NodeId>,
    /// Actor property of an NPC node.
    pub actor: Option<PropertyId>,
    pub lines: Vec<ConversationLine>,
}

impl Node {
    /// Whether an NPC speaks this node.
    pub fn is_npc(&self) -> bool {
        self.speaker == Speaker::Npc
    }
}

/// Non-fatal findings of the build pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BuildDiagnostic {
    /// More than one node has no predecessor; the first was chosen.
    MultipleStartNodes { chosen: Guid, ignored: Vec<Guid> },
    /// An NPC node has no lines and cannot be progressed.
    NpcWithoutLines { node: Guid },
}

/// An immutable, fully resolved dialogue graph.
#[derive(Debug, Clone)]
pub struct DialogueGraph {
    asset_guid: Guid,
    nodes: Vec<Node>,
    properties: Vec<Property>,
    node_index: HashMap<Guid, NodeId>,
    property_index: HashMap<Guid, PropertyId>,
    start: NodeId,
    diagnostics: Vec<BuildDiagnostic>,
}

impl DialogueGraph {
    /// Build an asset with default options.
    pub fn from_asset(asset: GraphAsset) -> BuildResult<Self> {
        GraphBuilder::default().build(asset)
    }

    /// Guid of the asset this graph was built from.
    pub fn asset_guid(&self) -> &Guid {
        &self.asset_guid
    }

    /// Handle of the node a conversation starts on.
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// The node a conversation starts on.
    pub fn start_node(&self) -> &Node {
        &self.nodes[self.start.index()]
    }

    /// Get a node by handle.
    ///
    /// Handles come from this graph, so a foreign handle is a caller bug and panics.
    /// Use [`DialogueGraph::get_node`] when the handle's origin is unknown.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a node by handle, or `None` if the handle is out of range.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Resolve a dialogue node guid to its handle.
    pub fn node_id(&self, guid: &str) -> Option<NodeId> {
        self.node_index.get(guid).copied()
    }

    /// Find a dialogue node by guid. Property and boolean nodes are not kept.
    pub fn node_by_guid(&self, guid: &str) -> Option<&Node> {
        self.node_id(guid).map(|id| self.node(id))
    }

    /// Iterate over all dialogue nodes with their handles, in asset order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Number of dialogue nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a property by handle. Panics on a foreign handle, like [`DialogueGraph::node`].
    pub fn property(&self, id: PropertyId) -> &Property {
        &self.properties[id.index()]
    }

    /// Get a property by handle, or `None` if the handle is out of range.
    pub fn get_property(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get(id.index())
    }

    /// Resolve a property guid to its handle.
    pub fn property_id(&self, guid: &str) -> Option<PropertyId> {
        self.property_index.get(guid).copied()
    }

    /// Find a property by guid.
    pub fn property_by_guid(&self, guid: &str) -> Option<&Property> {
        self.property_id(guid).map(|id| self.property(id))
    }

    /// Find a property by its derived reference name (e.g. `HAS_COIN`).
    pub fn property_by_reference_name(&self, reference_name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.reference_name == reference_name)
    }

    /// All properties of one type, in asset order.
    pub fn properties_of_type(&self, property_type: PropertyType) -> Vec<&Property> {
        self.properties
            .iter()
            .filter(|p| p.property_type == property_type)
            .collect()
    }

    /// All properties, indexed by [`PropertyId`].
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Non-fatal findings recorded while building.
    pub fn diagnostics(&self) -> &[BuildDiagnostic] {
        &self.diagnostics
    }
}
