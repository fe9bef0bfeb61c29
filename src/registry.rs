//! The migration registry and chain execution.
//!
//! The registry is the ordered, duplicate-free collection of every known
//! migration unit, keyed by version. All application entry points live
//! here: whole-dataset migration through an adapter, and single-record
//! migration. Both walk the units in ascending version order, so a chain
//! of pending migrations catches a dataset (or record) up in one call.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::MigrationResult;
use crate::migration::Migration;
use crate::record::Record;
use crate::source::MigrationSource;
use crate::version::Version;

/// An ordered, deduplicated collection of migration units.
///
/// Units are keyed by [`Version`], so iteration order is always ascending
/// and a version can only be registered once. The registry is explicitly
/// owned and explicitly cleared; nothing registers into it behind the
/// caller's back.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use caravan::{
///     MemoryAdapter, Migration, MigrationResult, Registry, StorageAdapter, Version,
/// };
/// use serde_json::Value;
///
/// struct CreateArchive {
///     version: Version,
/// }
///
/// impl Migration<MemoryAdapter, Value> for CreateArchive {
///     fn version(&self) -> &Version {
///         &self.version
///     }
///
///     fn can_migrate_database(&self, store: &MemoryAdapter) -> MigrationResult<bool> {
///         Ok(store.is_before(&self.version))
///     }
///
///     fn migrate_database(&self, store: &mut MemoryAdapter) -> MigrationResult<()> {
///         store.replace_records("archive", Vec::new());
///         store.set_current_version(self.version.clone());
///         Ok(())
///     }
/// }
///
/// # fn main() -> MigrationResult<()> {
/// let mut registry: Registry<MemoryAdapter, Value> = Registry::new();
/// registry.register(Arc::new(CreateArchive {
///     version: Version::new("2024_04_01_create_archive")?,
/// }));
///
/// let mut store = MemoryAdapter::new();
/// assert!(registry.can_migrate_database(&store)?);
/// registry.migrate_database(&mut store)?;
/// assert!(store.has_collection("archive"));
/// assert!(!registry.can_migrate_database(&store)?);
/// # Ok(())
/// # }
/// ```
///
/// # Process-wide registries
///
/// The registry does not impose a singleton. An embedder that wants one
/// wraps it in a lock behind a lazy static and takes the write guard
/// around loading and resetting:
///
/// ```
/// use std::sync::RwLock;
///
/// use caravan::{MemoryAdapter, Registry};
/// use once_cell::sync::Lazy;
/// use serde_json::Value;
///
/// static REGISTRY: Lazy<RwLock<Registry<MemoryAdapter, Value>>> =
///     Lazy::new(|| RwLock::new(Registry::new()));
///
/// let mut registry = REGISTRY.write().unwrap();
/// registry.reset();
/// assert!(registry.is_empty());
/// ```
pub struct Registry<A, R: Record> {
    units: BTreeMap<Version, Arc<dyn Migration<A, R>>>,
}

impl<A, R: Record> Registry<A, R> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            units: BTreeMap::new(),
        }
    }

    /// Registers a unit at its version's sorted position.
    ///
    /// Returns whether the unit was newly added. Registering a version
    /// that is already present is a no-op keeping the earlier unit, so
    /// re-running a load path never duplicates or replaces anything.
    pub fn register(&mut self, unit: Arc<dyn Migration<A, R>>) -> bool {
        match self.units.entry(unit.version().clone()) {
            Entry::Occupied(slot) => {
                let version = slot.key();
                tracing::debug!("Skipping already registered migration {version}");
                false
            }
            Entry::Vacant(slot) => {
                let version = slot.key();
                tracing::debug!("Registered migration {version}");
                slot.insert(unit);
                true
            }
        }
    }

    /// Registers every unit a source provides, returning how many were new.
    ///
    /// Loading is idempotent: feeding the same source again, including
    /// after intervening loads of other sources, adds nothing and changes
    /// nothing.
    pub fn load(&mut self, source: &dyn MigrationSource<A, R>) -> MigrationResult<usize> {
        let mut added = 0;
        for unit in source.migrations()? {
            if self.register(unit) {
                added += 1;
            }
        }
        tracing::debug!("Loaded {added} new migrations");
        Ok(added)
    }

    /// Removes every registered unit.
    ///
    /// Used for reload-without-restart and for isolating tests that share
    /// a process-wide registry.
    pub fn reset(&mut self) {
        self.units.clear();
        tracing::debug!("Cleared migration registry");
    }

    /// Returns whether any registered unit wants to migrate the adapter's
    /// current state.
    ///
    /// Checks units in ascending version order and short-circuits on the
    /// first match; a unit's error (including a missing database hook)
    /// propagates immediately.
    pub fn can_migrate_database(&self, adapter: &A) -> MigrationResult<bool> {
        for unit in self.units.values() {
            if unit.can_migrate_database(adapter)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Applies every applicable unit to the adapter, in ascending version
    /// order.
    ///
    /// Each unit's applicability is evaluated live, against the adapter
    /// state left by the unit before it, so one call walks a fresh or
    /// stale dataset through the whole pending chain. A failing unit stops
    /// the walk and surfaces its error; earlier units' effects stand.
    pub fn migrate_database(&self, adapter: &mut A) -> MigrationResult<()> {
        for unit in self.units.values() {
            if unit.can_migrate_database(adapter)? {
                let version = unit.version();
                tracing::info!("Applying migration {version}");
                unit.migrate_database(adapter)?;
            }
        }
        Ok(())
    }

    /// Returns whether any registered unit would transform the record.
    pub fn can_migrate_object(&self, record: &R) -> bool {
        self.units
            .values()
            .any(|unit| unit.can_migrate_object(record))
    }

    /// Folds the record through every applicable unit, in ascending
    /// version order.
    ///
    /// Each unit receives the record as the previous one left it. Records
    /// no unit applies to come back unchanged; a transform failure stops
    /// the fold and surfaces the error.
    pub fn migrate_object(&self, record: R) -> MigrationResult<R> {
        let mut record = record;
        for unit in self.units.values() {
            if unit.can_migrate_object(&record) {
                record = unit.migrate_object(record)?;
            }
        }
        Ok(record)
    }

    /// Returns the greatest registered version, or `None` when empty.
    pub fn highest_version(&self) -> Option<&Version> {
        self.units.keys().next_back()
    }

    /// Returns the number of registered units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns whether the registry holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns whether a unit is registered under the given version.
    pub fn contains_version(&self, version: &Version) -> bool {
        self.units.contains_key(version)
    }

    /// Returns the registered versions in ascending order.
    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.units.keys()
    }

    /// Returns the registered units in ascending version order.
    pub fn units(&self) -> impl Iterator<Item = &Arc<dyn Migration<A, R>>> {
        self.units.values()
    }
}

impl<A, R: Record> Default for Registry<A, R> {
    fn default() -> Self {
        Self::new()
    }
}
