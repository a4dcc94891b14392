//! Properties - named hooks connecting the graph to game state.

use serde::{Deserialize, Serialize};

use crate::Guid;

/// What a property stands for on the game side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    /// A speaker; game code registers display data for it.
    Actor,
    /// A predicate gating a line.
    Check,
    /// A side effect fired when a line is chosen.
    Trigger,
}

/// A named game-state hook declared by the authoring tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub guid: Guid,
    pub display_name: String,
    /// Name used by game code to find the property.
    pub reference_name: String,
    pub property_type: PropertyType,
}

impl Property {
    /// Create a property with a fresh guid.
    pub fn new(display_name: impl Into<String>, property_type: PropertyType) -> Self {
        let display_name = display_name.into();
        Self {
            guid: Guid::new(),
            reference_name: reference_name_for(&display_name),
            display_name,
            property_type,
        }
    }

    /// Shorthand for an actor property.
    pub fn actor(display_name: impl Into<String>) -> Self {
        Self::new(display_name, PropertyType::Actor)
    }

    /// Shorthand for a check property.
    pub fn check(display_name: impl Into<String>) -> Self {
        Self::new(display_name, PropertyType::Check)
    }

    /// Shorthand for a trigger property.
    pub fn trigger(display_name: impl Into<String>) -> Self {
        Self::new(display_name, PropertyType::Trigger)
    }

    /// Replace the generated guid.
    pub fn with_guid(mut self, guid: impl Into<Guid>) -> Self {
        self.guid = guid.into();
        self
    }

    /// Replace the derived reference name.
    pub fn with_reference_name(mut self, reference_name: impl Into<String>) -> Self {
        self.reference_name = reference_name.into();
        self
    }
}

/// Derive a reference name: uppercase, whitespace collapsed to underscores.
fn reference_name_for(display_name: &str) -> String {
    display_name
        .split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join("_")
}
