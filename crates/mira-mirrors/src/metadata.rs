//! Metadata storage for declarations
//!
//! Key/value metadata attached to a class target and, optionally, to a
//! named property of that target. Targets are identified by host identity
//! (function or object id); values without identity cannot carry metadata.
//! The store is session state owned by the caller, like the registry —
//! nothing here persists beyond the declaration session.

use mira_object::Value;
use rustc_hash::FxHashMap;

/// A metadata key
pub type MetadataKey = String;

/// Metadata attached to a single target
#[derive(Debug, Default)]
struct TargetMetadata {
    /// Direct metadata on the target (key -> value)
    direct: FxHashMap<MetadataKey, Value>,
    /// Property-level metadata (property -> key -> value)
    properties: FxHashMap<String, FxHashMap<MetadataKey, Value>>,
}

/// Session-scoped metadata store
#[derive(Debug, Default)]
pub struct MetadataStore {
    /// Map from target identity to its metadata
    targets: FxHashMap<u64, TargetMetadata>,
}

impl MetadataStore {
    /// Create a new empty metadata store
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Direct (target-level) metadata operations
    // ========================================================================

    /// Define metadata on a target. Returns false when the target has no
    /// identity.
    pub fn define_metadata(&mut self, key: &str, value: Value, target: &Value) -> bool {
        let Some(id) = target.identity() else {
            return false;
        };
        let entry = self.targets.entry(id).or_default();
        entry.direct.insert(key.to_string(), value);
        true
    }

    /// Get metadata from a target
    pub fn get_metadata(&self, key: &str, target: &Value) -> Option<Value> {
        let id = target.identity()?;
        self.targets.get(&id)?.direct.get(key).cloned()
    }

    /// Check if a target has metadata under `key`
    pub fn has_metadata(&self, key: &str, target: &Value) -> bool {
        let Some(id) = target.identity() else {
            return false;
        };
        self.targets
            .get(&id)
            .is_some_and(|entry| entry.direct.contains_key(key))
    }

    /// All metadata keys on a target
    pub fn metadata_keys(&self, target: &Value) -> Vec<MetadataKey> {
        let Some(id) = target.identity() else {
            return Vec::new();
        };
        self.targets
            .get(&id)
            .map(|entry| entry.direct.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Delete metadata from a target; returns whether it existed
    pub fn delete_metadata(&mut self, key: &str, target: &Value) -> bool {
        let Some(id) = target.identity() else {
            return false;
        };
        self.targets
            .get_mut(&id)
            .is_some_and(|entry| entry.direct.remove(key).is_some())
    }

    // ========================================================================
    // Property-level metadata operations
    // ========================================================================

    /// Define metadata on a property of a target
    pub fn define_metadata_property(
        &mut self,
        key: &str,
        value: Value,
        target: &Value,
        property_key: &str,
    ) -> bool {
        let Some(id) = target.identity() else {
            return false;
        };
        let entry = self.targets.entry(id).or_default();
        entry
            .properties
            .entry(property_key.to_string())
            .or_default()
            .insert(key.to_string(), value);
        true
    }

    /// Get metadata from a property of a target
    pub fn get_metadata_property(
        &self,
        key: &str,
        target: &Value,
        property_key: &str,
    ) -> Option<Value> {
        let id = target.identity()?;
        self.targets
            .get(&id)?
            .properties
            .get(property_key)?
            .get(key)
            .cloned()
    }

    /// Check if a property of a target has metadata under `key`
    pub fn has_metadata_property(&self, key: &str, target: &Value, property_key: &str) -> bool {
        self.get_metadata_property(key, target, property_key).is_some()
    }

    /// All metadata keys on a property of a target
    pub fn metadata_keys_property(&self, target: &Value, property_key: &str) -> Vec<MetadataKey> {
        let Some(id) = target.identity() else {
            return Vec::new();
        };
        self.targets
            .get(&id)
            .and_then(|entry| entry.properties.get(property_key))
            .map(|keys| keys.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Delete metadata from a property of a target; returns whether it
    /// existed
    pub fn delete_metadata_property(
        &mut self,
        key: &str,
        target: &Value,
        property_key: &str,
    ) -> bool {
        let Some(id) = target.identity() else {
            return false;
        };
        self.targets
            .get_mut(&id)
            .and_then(|entry| entry.properties.get_mut(property_key))
            .is_some_and(|keys| keys.remove(key).is_some())
    }
}
