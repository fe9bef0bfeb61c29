//! The storage adapter contract and an in-memory reference adapter.
//!
//! The engine never talks to storage directly: migration units drive a
//! caller-supplied adapter, and the engine itself only needs the version
//! marker that [`StorageAdapter`] exposes. Everything else about the
//! adapter's surface belongs to the units written against it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::version::Version;

/// The minimal surface the engine expects from persisted storage.
///
/// An adapter holds whatever data it holds, plus one comparable version
/// marker recording the last migration applied to it. Units read the marker
/// to decide applicability and write it back on completion; the engine
/// imposes no schema beyond that.
pub trait StorageAdapter {
    /// Returns the version marker, or `None` for never-migrated storage.
    fn current_version(&self) -> Option<&Version>;

    /// Sets the version marker.
    fn set_current_version(&mut self, version: Version);

    /// Returns whether the marker is behind the given version.
    ///
    /// An absent marker is behind every version, so fresh storage picks up
    /// the whole chain. This is the usual `can_migrate_database` check.
    fn is_before(&self, version: &Version) -> bool {
        self.current_version() < Some(version)
    }
}

/// An in-memory adapter holding named collections of JSON records.
///
/// Serves the test suites and doctests, and works as a starting point for
/// embedders whose data fits in memory. Collections are created on first
/// write; reading an absent collection yields an empty slice rather than
/// an error.
///
/// # Examples
///
/// ```
/// use caravan::{MemoryAdapter, StorageAdapter, Version};
/// use serde_json::json;
///
/// let mut store = MemoryAdapter::new();
/// assert!(store.current_version().is_none());
///
/// store.insert("tasks", json!({"type": "Task", "title": "water plants"}));
/// assert_eq!(store.records("tasks").len(), 1);
/// assert!(store.records("missing").is_empty());
///
/// let v1 = Version::new("2024_05_01_add_priority").unwrap();
/// assert!(store.is_before(&v1));
/// store.set_current_version(v1.clone());
/// assert!(!store.is_before(&v1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryAdapter {
    version: Option<Version>,
    collections: BTreeMap<String, Vec<Value>>,
}

impl MemoryAdapter {
    /// Creates an empty adapter with no version marker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the records in a collection, empty when the collection does
    /// not exist.
    pub fn records(&self, collection: &str) -> &[Value] {
        self.collections
            .get(collection)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns a mutable handle to a collection, creating it when absent.
    pub fn records_mut(&mut self, collection: &str) -> &mut Vec<Value> {
        self.collections.entry(collection.to_string()).or_default()
    }

    /// Appends a record to a collection, creating the collection when
    /// absent.
    pub fn insert(&mut self, collection: &str, record: Value) {
        self.records_mut(collection).push(record);
    }

    /// Replaces a collection's records wholesale.
    pub fn replace_records(&mut self, collection: &str, records: Vec<Value>) {
        self.collections.insert(collection.to_string(), records);
    }

    /// Removes a collection, returning its records if it existed.
    pub fn remove_collection(&mut self, collection: &str) -> Option<Vec<Value>> {
        self.collections.remove(collection)
    }

    /// Moves a collection's records under a new name.
    ///
    /// Returns false when the source collection does not exist. Any records
    /// already stored under the new name are replaced.
    pub fn rename_collection(&mut self, from: &str, to: &str) -> bool {
        match self.collections.remove(from) {
            Some(records) => {
                self.collections.insert(to.to_string(), records);
                true
            }
            None => false,
        }
    }

    /// Returns whether the collection exists.
    pub fn has_collection(&self, collection: &str) -> bool {
        self.collections.contains_key(collection)
    }

    /// Returns the collection names in sorted order.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }
}

impl StorageAdapter for MemoryAdapter {
    fn current_version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    fn set_current_version(&mut self, version: Version) {
        self.version = Some(version);
    }
}
