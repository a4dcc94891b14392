//! Per-instance game-side data: actor display data, check predicates and
//! trigger actions, keyed by property guid.
//!
//! Game code fills an [`InstanceData`] for each running dialogue asset. The
//! conversation walker consults it lazily; anything not registered is simply
//! absent - a missing check reads as `false` and a missing trigger does nothing.

mod registry;

pub use registry::*;

use dialogue_graph::{Guid, LineContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display data for an actor property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorData {
    pub name: String,
    /// Arbitrary game data attached to the actor (portrait, voice, ...).
    #[serde(default)]
    pub custom_data: serde_json::Value,
}

impl ActorData {
    /// Actor data with a display name and no custom data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            custom_data: serde_json::Value::Null,
        }
    }

    /// Attach game-specific data.
    pub fn with_custom_data(mut self, custom_data: serde_json::Value) -> Self {
        self.custom_data = custom_data;
        self
    }
}

/// Predicate answering a check property for one line.
pub type CheckFn = Box<dyn FnMut(&LineContext<'_>) -> bool>;

/// Side effect run when a line carrying the trigger property is chosen.
pub type TriggerFn = Box<dyn FnMut(&LineContext<'_>)>;

/// Callback and actor tables for one running dialogue instance.
#[derive(Default)]
pub struct InstanceData {
    actors: HashMap<Guid, ActorData>,
    checks: HashMap<Guid, CheckFn>,
    triggers: HashMap<Guid, Vec<TriggerFn>>,
}

impl InstanceData {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register display data for an actor property, replacing any previous entry.
    pub fn register_actor(&mut self, property: impl Into<Guid>, actor: ActorData) {
        self.actors.insert(property.into(), actor);
    }

    /// Register the predicate for a check property, replacing any previous one.
    pub fn register_check<F>(&mut self, property: impl Into<Guid>, check: F)
    where
        F: FnMut(&LineContext<'_>) -> bool + 'static,
    {
        self.checks.insert(property.into(), Box::new(check));
    }

    /// Add a listener to a trigger property. Listeners run in registration order.
    pub fn register_trigger<F>(&mut self, property: impl Into<Guid>, trigger: F)
    where
        F: FnMut(&LineContext<'_>) + 'static,
    {
        self.triggers
            .entry(property.into())
            .or_default()
            .push(Box::new(trigger));
    }

    /// Remove a check predicate. Returns whether one was registered.
    pub fn unregister_check(&mut self, property: &str) -> bool {
        self.checks.remove(property).is_some()
    }

    /// Remove every listener of a trigger property.
    pub fn unregister_triggers(&mut self, property: &str) -> bool {
        self.triggers.remove(property).is_some()
    }

    /// Display data registered for an actor property.
    pub fn actor(&self, property: &str) -> Option<&ActorData> {
        self.actors.get(property)
    }

    /// Whether a predicate is registered for a check property.
    pub fn has_check(&self, property: &str) -> bool {
        self.checks.contains_key(property)
    }

    /// Run the check predicate for `property`. `None` when nothing is registered.
    pub fn evaluate_check(&mut self, property: &str, context: &LineContext<'_>) -> Option<bool> {
        let check = self.checks.get_mut(property)?;
        let result = check(context);
        tracing::trace!(
            "Check {} on {}[{}] -> {}",
            property,
            context.node,
            context.line_index,
            result
        );
        Some(result)
    }

    /// Fire every listener of `property`. Returns how many ran.
    pub fn fire_trigger(&mut self, property: &str, context: &LineContext<'_>) -> usize {
        let Some(listeners) = self.triggers.get_mut(property) else {
            tracing::trace!("Trigger {} has no listeners", property);
            return 0;
        };

        for listener in listeners.iter_mut() {
            listener(context);
        }
        tracing::trace!(
            "Trigger {} fired {} listener(s) on {}[{}]",
            property,
            listeners.len(),
            context.node,
            context.line_index
        );
        listeners.len()
    }

    /// Drop all registrations.
    pub fn clear(&mut self) {
        self.actors.clear();
        self.checks.clear();
        self.triggers.clear();
    }

    /// Whether nothing is registered at all.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty() && self.checks.is_empty() && self.triggers.is_empty()
    }
}

impl std::fmt::Debug for InstanceData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceData")
            .field("actors", &self.actors)
            .field("checks", &self.checks.keys().collect::<Vec<_>>())
            .field("triggers", &self.triggers.keys().collect::<Vec<_>>())
            .finish()
    }
}
