//! # Dialogue Runtime
//!
//! Walks built dialogue graphs during play. This crate consumes a
//! [`DialogueGraph`](dialogue_graph::DialogueGraph) from `dialogue_graph` and
//! drives it with game-side callbacks.
//!
//! ## Core Components
//!
//! - **instance**: per-asset tables of actor data, check predicates and trigger actions
//! - **conversation**: the forward-only walker a presentation layer calls into
//!
//! Graphs are immutable and shared; each conversation keeps only its own
//! position, and each running asset gets its own [`InstanceData`].

pub mod conversation;
pub mod instance;

pub use conversation::{Conversation, ConversationError, ConversationState};
pub use instance::*;
