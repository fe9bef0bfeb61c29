//! Per-type dispatch tables for object-level migrations.
//!
//! A [`RecordHandlers`] table maps record type names to a pair of callables:
//! an optional applicability predicate and a required transform. The table is
//! built once, validated by [`RecordHandlersBuilder::build`], and then held
//! immutably by its migration unit, so a misconfigured unit (a declared type
//! with no transform) is caught before it can ever run.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::{MigrationError, MigrationResult};

/// The applicability predicate signature for one record type.
///
/// Predicates are pure checks: they decide whether the type's transform
/// should run on a given record, and returning `false` is a normal, silent
/// outcome rather than an error.
pub type PredicateFn<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// The transform signature for one record type.
///
/// Transforms take the record by value and return the migrated value, so
/// mutating in place and returning a replacement instance look the same to
/// the caller. Failures propagate unmodified through the migration chain.
pub type TransformFn<R> = Box<dyn Fn(R) -> MigrationResult<R> + Send + Sync>;

/// Normalizes a record type name into a handler key.
///
/// Every character outside `[A-Za-z0-9_]` is substituted with `_`, so a
/// dotted name like `catalog.Widget` and its normalized form
/// `catalog_Widget` resolve to the same handler. The mapping is total: any
/// input yields a usable key.
///
/// # Examples
///
/// ```
/// use caravan::handlers::sanitize_type_name;
///
/// assert_eq!(sanitize_type_name("Task"), "Task");
/// assert_eq!(sanitize_type_name("catalog.Widget"), "catalog_Widget");
/// assert_eq!(sanitize_type_name("shapes::Circle"), "shapes__Circle");
/// ```
pub fn sanitize_type_name(raw: &str) -> Cow<'_, str> {
    if raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(
        raw.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
    )
}

/// Sanitizes an owned type name without re-allocating when it is already
/// a clean key.
fn handler_key(type_name: impl Into<String>) -> String {
    let raw = type_name.into();
    match sanitize_type_name(&raw) {
        Cow::Borrowed(_) => raw,
        Cow::Owned(sanitized) => sanitized,
    }
}

/// A validated handler pair for one record type.
struct Handler<R> {
    predicate: Option<PredicateFn<R>>,
    transform: TransformFn<R>,
}

/// An immutable, validated table of per-type migration handlers.
///
/// The table's key set is a migration unit's set of supported record types.
/// Lookups sanitize the incoming type name the same way registration does,
/// so both sides of the dispatch agree on the key space.
///
/// # Examples
///
/// ```
/// use caravan::RecordHandlers;
/// use serde_json::{json, Value};
///
/// let handlers: RecordHandlers<Value> = RecordHandlers::builder()
///     .predicate("Task", |record: &Value| record.get("priority").is_none())
///     .transform("Task", |mut record: Value| {
///         record["priority"] = json!(2);
///         Ok(record)
///     })
///     .build()
///     .unwrap();
///
/// assert!(handlers.contains("Task"));
/// let migrated = handlers.apply("Task", json!({"type": "Task"})).unwrap();
/// assert_eq!(migrated["priority"], json!(2));
/// ```
pub struct RecordHandlers<R> {
    entries: BTreeMap<String, Handler<R>>,
}

impl<R> RecordHandlers<R> {
    /// Starts building a handler table.
    pub fn builder() -> RecordHandlersBuilder<R> {
        RecordHandlersBuilder {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the supported type names in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns whether the table has an entry for the given type.
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries
            .contains_key(sanitize_type_name(type_name).as_ref())
    }

    /// Returns the number of supported types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table supports no types at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether the table would transform a record of the given type.
    ///
    /// `false` when the type has no entry; otherwise the entry's predicate
    /// decides, defaulting to `true` when no predicate is bound.
    pub fn can_migrate(&self, type_name: &str, record: &R) -> bool {
        match self.entries.get(sanitize_type_name(type_name).as_ref()) {
            Some(handler) => handler.predicate.as_ref().map_or(true, |p| p(record)),
            None => false,
        }
    }

    /// Runs the type's transform on the record and returns the result.
    ///
    /// A record whose type has no entry, or whose predicate reports
    /// not-applicable, passes through unchanged.
    pub fn apply(&self, type_name: &str, record: R) -> MigrationResult<R> {
        match self.entries.get(sanitize_type_name(type_name).as_ref()) {
            Some(handler) => {
                if let Some(predicate) = &handler.predicate {
                    if !predicate(&record) {
                        return Ok(record);
                    }
                }
                (handler.transform)(record)
            }
            None => Ok(record),
        }
    }
}

/// Accumulates handler declarations before validation.
struct BuilderEntry<R> {
    predicate: Option<PredicateFn<R>>,
    transform: Option<TransformFn<R>>,
}

/// Builds and validates a [`RecordHandlers`] table.
///
/// `supports`, `predicate`, and `transform` all declare their type as
/// supported; [`build`](Self::build) then enforces the invariant that every
/// declared type has a transform bound. Rebinding a predicate or transform
/// for the same type replaces the previous one.
pub struct RecordHandlersBuilder<R> {
    entries: BTreeMap<String, BuilderEntry<R>>,
}

impl<R> RecordHandlersBuilder<R> {
    /// Declares a supported record type without binding handlers yet.
    pub fn supports(mut self, type_name: impl Into<String>) -> Self {
        self.entry(type_name);
        self
    }

    /// Binds the applicability predicate for a type, declaring it supported.
    pub fn predicate(
        mut self,
        type_name: impl Into<String>,
        predicate: impl Fn(&R) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.entry(type_name).predicate = Some(Box::new(predicate));
        self
    }

    /// Binds the transform for a type, declaring it supported.
    pub fn transform(
        mut self,
        type_name: impl Into<String>,
        transform: impl Fn(R) -> MigrationResult<R> + Send + Sync + 'static,
    ) -> Self {
        self.entry(type_name).transform = Some(Box::new(transform));
        self
    }

    /// Validates the declarations and freezes the table.
    ///
    /// Fails with [`MigrationError::Configuration`], naming the type, when a
    /// declared type has no transform bound to it.
    pub fn build(self) -> MigrationResult<RecordHandlers<R>> {
        let mut entries = BTreeMap::new();
        for (type_name, entry) in self.entries {
            match entry.transform {
                Some(transform) => {
                    entries.insert(
                        type_name,
                        Handler {
                            predicate: entry.predicate,
                            transform,
                        },
                    );
                }
                None => {
                    return Err(MigrationError::Configuration(format!(
                        "no transform function for record type \"{type_name}\""
                    )));
                }
            }
        }
        Ok(RecordHandlers { entries })
    }

    fn entry(&mut self, type_name: impl Into<String>) -> &mut BuilderEntry<R> {
        self.entries
            .entry(handler_key(type_name))
            .or_insert_with(|| BuilderEntry {
                predicate: None,
                transform: None,
            })
    }
}
