//! The build pass - resolves an asset's port-level wiring into a [`DialogueGraph`].
//!
//! Steps:
//! 1. Index properties and nodes by guid; reject duplicates and edges naming unknown nodes
//! 2. Map property nodes to the property they stand for
//! 3. Resolve every line's triggers, checks, check trees and successor
//! 4. Find each node's actor and predecessor
//! 5. Drop property and boolean nodes; pick the start node

use serde::Deserialize;
use std::collections::HashMap;

use super::{BuildDiagnostic, ConversationLine, DialogueGraph, Node, Speaker};
use crate::check_tree::CheckTree;
use crate::error::{BuildError, BuildResult, ConfigError};
use crate::{Edge, GraphAsset, Guid, NodeId, NodeKind, Property, PropertyId, PropertyType, RawLine, RawNode};

/// What to do when several nodes have no predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartNodePolicy {
    /// Keep the first candidate in asset order and record a diagnostic.
    #[default]
    FirstWins,
    /// Fail the build.
    Reject,
}

/// Options for the build pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub start_nodes: StartNodePolicy,
    /// Most property leaves a single line's check trees may expand to.
    /// Boolean nodes shared by several operands are expanded once per use.
    pub max_check_leaves: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            start_nodes: StartNodePolicy::default(),
            max_check_leaves: Self::DEFAULT_MAX_CHECK_LEAVES,
        }
    }
}

impl BuildOptions {
    pub const DEFAULT_MAX_CHECK_LEAVES: usize = 1024;

    /// Parse options from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

/// Turns assets into dialogue graphs.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
}

impl GraphBuilder {
    /// Create a builder with the given options.
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Options this builder runs with.
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Run the build pass.
    ///
    /// Any integrity violation aborts the build; no partial graph is returned.
    pub fn build(&self, asset: GraphAsset) -> BuildResult<DialogueGraph> {
        let GraphAsset {
            asset_guid,
            nodes: raw_nodes,
            edges,
            properties,
            ..
        } = asset;

        let property_index = index_properties(&properties)?;

        let mut kinds: HashMap<&str, NodeKind> = HashMap::with_capacity(raw_nodes.len());
        for node in &raw_nodes {
            if kinds.insert(node.guid.as_str(), node.kind).is_some() {
                return Err(BuildError::DuplicateNode(node.guid.clone()));
            }
        }

        for edge in &edges {
            for endpoint in [&edge.from_node, &edge.to_node] {
                if !kinds.contains_key(endpoint.as_str()) {
                    return Err(BuildError::DanglingEdge {
                        from_node: edge.from_node.clone(),
                        from_port: edge.from_port.clone(),
                        to_node: edge.to_node.clone(),
                        to_port: edge.to_port.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }

        // Walkable nodes keep their asset order in the arena.
        let walkable: Vec<&RawNode> = raw_nodes.iter().filter(|n| n.kind.is_walkable()).collect();
        let node_index: HashMap<Guid, NodeId> = walkable
            .iter()
            .enumerate()
            .map(|(i, node)| (node.guid.clone(), NodeId(i as u32)))
            .collect();

        let mut property_nodes: HashMap<&str, PropertyId> = HashMap::new();
        for node in raw_nodes.iter().filter(|n| n.kind == NodeKind::Property) {
            let property = node.property.clone().unwrap_or_else(Guid::empty);
            let Some(&id) = property_index.get(property.as_str()) else {
                return Err(BuildError::UnknownProperty {
                    node: node.guid.clone(),
                    property,
                });
            };
            property_nodes.insert(node.guid.as_str(), id);
        }

        let linker = Linker {
            edges: &edges,
            kinds: &kinds,
            property_nodes: &property_nodes,
            node_index: &node_index,
            properties: &properties,
            max_check_leaves: self.options.max_check_leaves,
        };

        let mut nodes = Vec::with_capacity(walkable.len());
        for raw in &walkable {
            nodes.push(linker.node(raw)?);
        }

        let mut diagnostics = Vec::new();
        let start = self.pick_start(&nodes, &mut diagnostics)?;

        for node in nodes.iter().filter(|n| n.is_npc() && n.lines.is_empty()) {
            tracing::warn!("NPC node {} has no lines", node.guid);
            diagnostics.push(BuildDiagnostic::NpcWithoutLines {
                node: node.guid.clone(),
            });
        }

        tracing::debug!(
            "Built dialogue graph {}: {} dialogue nodes, {} properties, start {}",
            asset_guid,
            nodes.len(),
            properties.len(),
            nodes[start.index()].guid
        );

        Ok(DialogueGraph {
            asset_guid,
            nodes,
            properties,
            node_index,
            property_index,
            start,
            diagnostics,
        })
    }

    fn pick_start(
        &self,
        nodes: &[Node],
        diagnostics: &mut Vec<BuildDiagnostic>,
    ) -> BuildResult<NodeId> {
        let candidates: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.previous.is_none())
            .map(|(i, _)| i)
            .collect();

        let Some((&first, rest)) = candidates.split_first() else {
            return Err(BuildError::NoStartNode);
        };

        if !rest.is_empty() {
            let ignored: Vec<Guid> = rest.iter().map(|&i| nodes[i].guid.clone()).collect();
            match self.options.start_nodes {
                StartNodePolicy::Reject => {
                    let candidates = candidates.iter().map(|&i| nodes[i].guid.clone()).collect();
                    return Err(BuildError::AmbiguousStartNode { candidates });
                }
                StartNodePolicy::FirstWins => {
                    tracing::warn!(
                        "Multiple start nodes; using {} and ignoring {:?}",
                        nodes[first].guid,
                        ignored
                    );
                    diagnostics.push(BuildDiagnostic::MultipleStartNodes {
                        chosen: nodes[first].guid.clone(),
                        ignored,
                    });
                }
            }
        }

        Ok(NodeId(first as u32))
    }
}

fn index_properties(properties: &[Property]) -> BuildResult<HashMap<Guid, PropertyId>> {
    let mut index = HashMap::with_capacity(properties.len());
    for (i, property) in properties.iter().enumerate() {
        if index
            .insert(property.guid.clone(), PropertyId(i as u32))
            .is_some()
        {
            return Err(BuildError::DuplicateProperty(property.guid.clone()));
        }
    }
    Ok(index)
}

/// Borrowed lookup tables shared by the per-node resolution steps.
struct Linker<'a> {
    edges: &'a [Edge],
    kinds: &'a HashMap<&'a str, NodeKind>,
    property_nodes: &'a HashMap<&'a str, PropertyId>,
    node_index: &'a HashMap<Guid, NodeId>,
    properties: &'a [Property],
    max_check_leaves: usize,
}

/// Leaves spent so far on one line's check trees.
struct LeafBudget<'n> {
    node: &'n Guid,
    line: usize,
    limit: usize,
    spent: usize,
}

impl LeafBudget<'_> {
    fn spend(&mut self) -> BuildResult<()> {
        self.spent += 1;
        if self.spent > self.limit {
            return Err(BuildError::CheckTreeTooLarge {
                node: self.node.clone(),
                line: self.line,
                limit: self.limit,
            });
        }
        Ok(())
    }
}

impl<'a> Linker<'a> {
    fn node(&self, raw: &RawNode) -> BuildResult<Node> {
        let speaker = match raw.kind {
            NodeKind::Npc => Speaker::Npc,
            _ => Speaker::Player,
        };

        let lines = raw
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| self.line(raw, i, line))
            .collect::<BuildResult<Vec<_>>>()?;

        Ok(Node {
            guid: raw.guid.clone(),
            speaker,
            previous: self.previous(raw),
            actor: if speaker == Speaker::Npc { self.actor(raw) } else { None },
            lines,
        })
    }

    fn line(&self, node: &RawNode, index: usize, raw: &RawLine) -> BuildResult<ConversationLine> {
        let mut line = ConversationLine {
            message: raw.message.clone(),
            next: None,
            triggers: Vec::new(),
            checks: Vec::new(),
            check_trees: Vec::new(),
        };

        let mut budget = LeafBudget {
            node: &node.guid,
            line: index,
            limit: self.max_check_leaves,
            spent: 0,
        };

        for edge in self.edges {
            if !raw.trigger_port.is_empty() && edge.from_port == raw.trigger_port {
                let property = self
                    .property_nodes
                    .get(edge.to_node.as_str())
                    .copied()
                    .ok_or_else(|| BuildError::NotAPropertyNode {
                        node: edge.to_node.clone(),
                    })?;
                line.triggers.push(property);
            }

            if node.kind == NodeKind::Npc
                && !raw.check_port.is_empty()
                && edge.to_port == raw.check_port
            {
                if let Some(&property) = self.property_nodes.get(edge.from_node.as_str()) {
                    line.checks.push(property);
                }
                line.check_trees
                    .push(self.check_tree(edge, &mut Vec::new(), &mut budget)?);
            }

            if line.next.is_none()
                && !raw.next_port.is_empty()
                && edge.from_node == node.guid
                && edge.from_port == raw.next_port
            {
                let target = self
                    .node_index
                    .get(edge.to_node.as_str())
                    .copied()
                    .ok_or_else(|| BuildError::NotWalkable {
                        node: node.guid.clone(),
                        line: index,
                        target: edge.to_node.clone(),
                    })?;
                line.next = Some(target);
            }
        }

        Ok(line)
    }

    /// Parse the expression feeding `edge`, walking boolean nodes backwards.
    ///
    /// `visiting` holds the boolean nodes on the current path.
    fn check_tree(
        &self,
        edge: &'a Edge,
        visiting: &mut Vec<&'a str>,
        budget: &mut LeafBudget<'_>,
    ) -> BuildResult<CheckTree> {
        let source = edge.from_node.as_str();
        let kind = self.kinds.get(source).copied();

        if kind == Some(NodeKind::BooleanNot) {
            let inputs = self.enter(source, 1, visiting)?;
            let operand = self.check_tree(inputs[0], visiting, budget)?;
            visiting.pop();
            return Ok(CheckTree::not(operand));
        }

        if let Some(operation) = kind.and_then(NodeKind::binary_operation) {
            let inputs = self.enter(source, 2, visiting)?;
            let a = self.check_tree(inputs[0], visiting, budget)?;
            let b = self.check_tree(inputs[1], visiting, budget)?;
            visiting.pop();
            return Ok(CheckTree::binary(operation, a, b));
        }

        budget.spend()?;
        Ok(CheckTree::Property(self.property_nodes.get(source).copied()))
    }

    /// Collect the inputs of a boolean node and push it onto the path.
    fn enter(
        &self,
        node: &'a str,
        expected: usize,
        visiting: &mut Vec<&'a str>,
    ) -> BuildResult<Vec<&'a Edge>> {
        if visiting.contains(&node) {
            return Err(BuildError::CyclicCheckTree { node: node.into() });
        }

        let inputs: Vec<&'a Edge> = self
            .edges
            .iter()
            .filter(|e| e.to_node.as_str() == node)
            .collect();
        if inputs.len() != expected {
            return Err(BuildError::MalformedBooleanNode {
                node: node.into(),
                expected,
                found: inputs.len(),
            });
        }

        visiting.push(node);
        Ok(inputs)
    }

    fn actor(&self, node: &RawNode) -> Option<PropertyId> {
        self.edges
            .iter()
            .filter(|e| e.to_node == node.guid)
            .filter_map(|e| self.property_nodes.get(e.from_node.as_str()).copied())
            .find(|p| self.properties[p.index()].property_type == PropertyType::Actor)
    }

    fn previous(&self, node: &RawNode) -> Option<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.to_node == node.guid)
            .find_map(|e| self.node_index.get(e.from_node.as_str()).copied())
    }
}
