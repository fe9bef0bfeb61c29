//! The migration unit contract.
//!
//! A migration unit is a versioned transformation that knows how to apply
//! itself to a whole dataset through a storage adapter, to individual
//! records of the types it declares, or both. Units are held by the
//! [`Registry`](crate::Registry) behind `Arc<dyn Migration>` and executed in
//! ascending version order.

use std::borrow::Cow;

use crate::error::{MigrationError, MigrationResult};
use crate::handlers::RecordHandlers;
use crate::record::Record;
use crate::version::Version;

/// A single versioned migration unit.
///
/// The type parameters keep the engine storage-agnostic: `A` is the concrete
/// storage adapter a unit drives (opaque to the engine, passed straight
/// through), and `R` is the record representation for object-level
/// migrations.
///
/// Database-level migrations implement [`can_migrate_database`] and
/// [`migrate_database`]; the provided defaults fail with
/// [`MigrationError::NotImplemented`], so forgetting them is a loud error
/// rather than a silent skip. Object-level migrations supply a
/// [`RecordHandlers`] table via [`handlers`]; the provided object methods
/// then dispatch on the record's resolved type name. A unit may implement
/// either side or both.
///
/// [`can_migrate_database`]: Migration::can_migrate_database
/// [`migrate_database`]: Migration::migrate_database
/// [`handlers`]: Migration::handlers
///
/// # Examples
///
/// ```
/// use caravan::{Migration, MigrationResult, RecordHandlers, Version};
/// use serde_json::{json, Value};
///
/// struct AddPriority {
///     version: Version,
///     handlers: RecordHandlers<Value>,
/// }
///
/// impl AddPriority {
///     fn new() -> MigrationResult<Self> {
///         Ok(Self {
///             version: Version::new("2024_05_01_add_priority")?,
///             handlers: RecordHandlers::builder()
///                 .predicate("Task", |task: &Value| task.get("priority").is_none())
///                 .transform("Task", |mut task: Value| {
///                     task["priority"] = json!(2);
///                     Ok(task)
///                 })
///                 .build()?,
///         })
///     }
/// }
///
/// impl Migration<(), Value> for AddPriority {
///     fn version(&self) -> &Version {
///         &self.version
///     }
///
///     fn handlers(&self) -> Option<&RecordHandlers<Value>> {
///         Some(&self.handlers)
///     }
///
///     fn can_migrate_database(&self, _adapter: &()) -> MigrationResult<bool> {
///         Ok(false)
///     }
///
///     fn migrate_database(&self, _adapter: &mut ()) -> MigrationResult<()> {
///         Ok(())
///     }
/// }
///
/// # fn main() -> MigrationResult<()> {
/// let unit = AddPriority::new()?;
/// let task = json!({"type": "Task", "title": "file taxes"});
/// assert!(unit.can_migrate_object(&task));
/// let task = unit.migrate_object(task)?;
/// assert_eq!(task["priority"], json!(2));
/// assert!(!unit.can_migrate_object(&task));
/// # Ok(())
/// # }
/// ```
pub trait Migration<A, R: Record>: Send + Sync {
    /// Returns the unit's version token.
    ///
    /// Versions order the chain and deduplicate registration; every unit
    /// must carry exactly one.
    fn version(&self) -> &Version;

    /// Returns the unit's per-type handler table, if it migrates records.
    ///
    /// `None` (the default) marks a database-only unit: the object-level
    /// methods then report nothing applicable and pass records through.
    fn handlers(&self) -> Option<&RecordHandlers<R>> {
        None
    }

    /// Resolves the type name used to dispatch a record into the handler
    /// table.
    ///
    /// Defaults to the record's own tag. Override to read the tag from
    /// somewhere else, such as a field embedded in a serialized document.
    fn record_type<'r>(&self, record: &'r R) -> Cow<'r, str> {
        Cow::Borrowed(record.type_name())
    }

    /// Returns whether this unit's database migration should run against
    /// the adapter's current state.
    ///
    /// Every concrete unit decides this itself, typically by comparing the
    /// adapter's version marker against [`version`](Migration::version).
    /// The default fails with [`MigrationError::NotImplemented`].
    fn can_migrate_database(&self, _adapter: &A) -> MigrationResult<bool> {
        Err(MigrationError::NotImplemented(format!(
            "can_migrate_database for migration {}",
            self.version()
        )))
    }

    /// Applies this unit's database migration through the adapter.
    ///
    /// On success the unit must leave the adapter's version marker at its
    /// own version, which is what lets a chain of units apply back to back.
    /// The default fails with [`MigrationError::NotImplemented`].
    fn migrate_database(&self, _adapter: &mut A) -> MigrationResult<()> {
        Err(MigrationError::NotImplemented(format!(
            "migrate_database for migration {}",
            self.version()
        )))
    }

    /// Returns whether this unit would transform the given record.
    ///
    /// False for units without handlers, for record types outside the
    /// table, and for records whose type predicate reports not-applicable.
    fn can_migrate_object(&self, record: &R) -> bool {
        match self.handlers() {
            Some(handlers) => {
                let type_name = self.record_type(record);
                handlers.can_migrate(&type_name, record)
            }
            None => false,
        }
    }

    /// Migrates a single record, returning it unchanged when this unit does
    /// not apply to it.
    ///
    /// Not-applicable is a normal outcome, not an error: only a transform's
    /// own failure surfaces as `Err`. Callers must use the returned record;
    /// transforms may replace the value outright rather than mutate it.
    fn migrate_object(&self, record: R) -> MigrationResult<R> {
        match self.handlers() {
            Some(handlers) => {
                let type_name = self.record_type(&record).into_owned();
                handlers.apply(&type_name, record)
            }
            None => Ok(record),
        }
    }
}
