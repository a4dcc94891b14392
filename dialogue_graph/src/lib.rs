//! # Dialogue Graph
//!
//! The data side of the dialogue system: the compiled asset handed over by the
//! authoring tool, the boolean check trees gating NPC lines, and the build pass
//! that turns port-level wiring into an immutable, walkable [`DialogueGraph`].
//!
//! ## Lifecycle
//!
//! - **Ingest**: a [`GraphAsset`] of flat nodes, edges and properties keyed by string guid
//! - **Build**: [`GraphBuilder`] resolves the wiring once and fails fast on integrity errors
//! - **Share**: the built graph is read-only and can back any number of conversations

pub mod asset;
pub mod check_tree;
pub mod error;
pub mod graph;
pub mod ids;
pub mod property;

pub use asset::*;
pub use check_tree::*;
pub use error::*;
pub use graph::*;
pub use ids::*;
pub use property::*;
