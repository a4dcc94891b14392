//! Bridges check-tree leaves to the predicates registered in [`InstanceData`].

use dialogue_graph::{CheckResolver, DialogueGraph, LineContext, PropertyId};

use crate::instance::InstanceData;

/// Resolves property handles through the graph to their guid, then asks the
/// instance data for an answer.
pub(crate) struct InstanceResolver<'a> {
    pub(crate) graph: &'a DialogueGraph,
    pub(crate) data: &'a mut InstanceData,
}

impl CheckResolver for InstanceResolver<'_> {
    fn resolve(&mut self, property: PropertyId, context: &LineContext<'_>) -> Option<bool> {
        let guid = &self.graph.property(property).guid;
        self.data.evaluate_check(guid.as_str(), context)
    }
}
