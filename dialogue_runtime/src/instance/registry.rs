//! Instance registry - lazily created instance data per dialogue asset.

use dialogue_graph::Guid;
use std::collections::HashMap;

use super::InstanceData;

/// Holds the [`InstanceData`] of every asset the host is currently running.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: HashMap<Guid, InstanceData>,
}

impl InstanceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the data for an asset, creating an empty table on first access.
    pub fn get_or_create(&mut self, asset: &Guid) -> &mut InstanceData {
        self.instances.entry(asset.clone()).or_insert_with(|| {
            tracing::debug!("Creating instance data for dialogue asset {}", asset);
            InstanceData::new()
        })
    }

    /// Data of an asset, if it was ever requested.
    pub fn get(&self, asset: &str) -> Option<&InstanceData> {
        self.instances.get(asset)
    }

    /// Mutable data of an asset, without creating it.
    pub fn get_mut(&mut self, asset: &str) -> Option<&mut InstanceData> {
        self.instances.get_mut(asset)
    }

    /// Whether an asset has data.
    pub fn contains(&self, asset: &str) -> bool {
        self.instances.contains_key(asset)
    }

    /// Remove and return an asset's data.
    pub fn remove(&mut self, asset: &str) -> Option<InstanceData> {
        self.instances.remove(asset)
    }

    /// Drop the data of every asset.
    pub fn clear(&mut self) {
        tracing::debug!("Clearing {} dialogue instance(s)", self.instances.len());
        self.instances.clear();
    }

    /// Number of assets with data.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
