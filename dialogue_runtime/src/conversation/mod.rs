//! Conversation walker - steps through a built dialogue graph.
//!
//! A [`Conversation`] is a cursor over a shared [`DialogueGraph`]. It moves
//! forward only:
//! 1. **Reset**: stand on the graph's start node
//! 2. **Progress**: choose a line (by checks for NPCs, by index for the player)
//! 3. **Fire**: run the chosen line's triggers
//! 4. **Advance**: move to the line's successor, or finish when it has none
//!
//! The walker owns nothing but its position. Callback tables live in an
//! [`InstanceData`] passed to the operations that need them, so several
//! walkers can share one graph without seeing each other's state.

mod resolver;

use dialogue_graph::{ConversationLine, DialogueGraph, Guid, LineContext, Node, NodeId};
use thiserror::Error;

use crate::instance::{ActorData, InstanceData};
use resolver::InstanceResolver;

/// Where a conversation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    /// Not started yet.
    #[default]
    Idle,
    /// Standing on a node.
    Active(NodeId),
    /// Finished, either by reaching a line without successor or by [`Conversation::end`].
    Done,
}

/// Operations called in a state where they do not apply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    #[error("no conversation in progress")]
    NotInConversation,

    #[error("node {0} is not an NPC node")]
    NotAnNpcNode(Guid),

    #[error("node {0} has no lines")]
    NodeHasNoLines(Guid),

    #[error("line {index} out of range for node {node} ({count} lines)")]
    LineOutOfRange {
        node: Guid,
        index: usize,
        count: usize,
    },
}

pub type Result<T> = std::result::Result<T, ConversationError>;

/// A single playthrough of a dialogue graph.
#[derive(Debug, Clone)]
pub struct Conversation<'g> {
    graph: &'g DialogueGraph,
    state: ConversationState,
}

impl<'g> Conversation<'g> {
    /// Create an idle conversation over `graph`.
    pub fn new(graph: &'g DialogueGraph) -> Self {
        Self {
            graph,
            state: ConversationState::Idle,
        }
    }

    /// The graph being walked.
    pub fn graph(&self) -> &'g DialogueGraph {
        self.graph
    }

    /// Current position.
    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Start (or restart) at the graph's start node.
    pub fn reset(&mut self) {
        let start = self.graph.start();
        tracing::debug!(
            "Conversation on {} starting at {}",
            self.graph.asset_guid(),
            self.graph.node(start).guid
        );
        self.state = ConversationState::Active(start);
    }

    /// Finish the conversation immediately. Always honored.
    pub fn end(&mut self) {
        tracing::debug!("Conversation on {} ended", self.graph.asset_guid());
        self.state = ConversationState::Done;
    }

    /// Whether the conversation has finished.
    pub fn is_done(&self) -> bool {
        self.state == ConversationState::Done
    }

    /// Whether the walker stands on a node.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ConversationState::Active(_))
    }

    /// The node the walker stands on.
    pub fn current_node(&self) -> Option<&'g Node> {
        match self.state {
            ConversationState::Active(id) => Some(self.graph.node(id)),
            _ => None,
        }
    }

    /// Guid of the node the walker stands on.
    pub fn current_node_guid(&self) -> Option<&'g Guid> {
        self.current_node().map(|node| &node.guid)
    }

    /// Whether the walker stands on an NPC node.
    pub fn is_current_npc(&self) -> bool {
        self.current_node().is_some_and(Node::is_npc)
    }

    /// Display data of the current NPC's actor, if one is wired and registered.
    pub fn current_actor<'d>(&self, data: &'d InstanceData) -> Option<&'d ActorData> {
        let node = self.current_node().filter(|node| node.is_npc())?;
        let actor = node.actor?;
        data.actor(self.graph.property(actor).guid.as_str())
    }

    /// Lines of the current node; empty when no conversation is in progress.
    pub fn current_lines(&self) -> &'g [ConversationLine] {
        self.current_node()
            .map(|node| node.lines.as_slice())
            .unwrap_or(&[])
    }

    /// Let the current NPC speak.
    ///
    /// Every line but the last is checked in order and the first that passes
    /// is chosen. The last line is the fallback and is chosen without
    /// consulting its checks.
    pub fn progress_npc(&mut self, data: &mut InstanceData) -> Result<&'g str> {
        let node = self.active_node()?;
        if !node.is_npc() {
            return Err(ConversationError::NotAnNpcNode(node.guid.clone()));
        }
        let Some(fallback) = node.lines.len().checked_sub(1) else {
            return Err(ConversationError::NodeHasNoLines(node.guid.clone()));
        };

        let mut resolver = InstanceResolver {
            graph: self.graph,
            data: &mut *data,
        };
        let selected = (0..fallback)
            .find(|&index| {
                let context = LineContext {
                    node: &node.guid,
                    line_index: index,
                };
                node.lines[index].passes(&mut resolver, &context)
            })
            .unwrap_or(fallback);

        Ok(self.progress(node, selected, data))
    }

    /// The player picked line `index` of the current node. No checks apply.
    pub fn progress_self(&mut self, index: usize, data: &mut InstanceData) -> Result<&'g str> {
        let node = self.active_node()?;
        if index >= node.lines.len() {
            return Err(ConversationError::LineOutOfRange {
                node: node.guid.clone(),
                index,
                count: node.lines.len(),
            });
        }

        Ok(self.progress(node, index, data))
    }

    fn active_node(&self) -> Result<&'g Node> {
        self.current_node()
            .ok_or(ConversationError::NotInConversation)
    }

    /// Fire the chosen line's triggers and move past it.
    fn progress(&mut self, node: &'g Node, index: usize, data: &mut InstanceData) -> &'g str {
        let line = &node.lines[index];
        let context = LineContext {
            node: &node.guid,
            line_index: index,
        };

        for &trigger in &line.triggers {
            data.fire_trigger(self.graph.property(trigger).guid.as_str(), &context);
        }

        self.state = match line.next {
            Some(next) => {
                tracing::debug!(
                    "{}[{}] -> {}",
                    node.guid,
                    index,
                    self.graph.node(next).guid
                );
                ConversationState::Active(next)
            }
            None => {
                tracing::debug!("{}[{}] ends the conversation", node.guid, index);
                ConversationState::Done
            }
        };

        &line.message
    }
}
