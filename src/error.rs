//! Error types for the migration engine.
//!
//! The engine draws a hard line between construction time and execution time:
//! authoring mistakes ([`MigrationError::Configuration`], missing database
//! hooks surfacing as [`MigrationError::NotImplemented`]) fail fast and loud,
//! while a record the engine simply has no handler for is never an error:
//! it passes through untouched.

use thiserror::Error;

/// The error type for every fallible operation in the engine.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// A migration unit declared an unsatisfiable configuration: an empty
    /// version token, or a supported record type with no transform bound.
    ///
    /// Raised while the unit is being constructed, before it can reach a
    /// registry.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A concrete unit did not supply one of the database-level hooks
    /// (`can_migrate_database` / `migrate_database`), which have no default
    /// behavior.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A unit's own migration logic, or the adapter it drives, failed.
    ///
    /// The engine propagates these unmodified through the chain; it never
    /// retries or skips on the unit's behalf.
    #[error("migration failed: {0}")]
    Execution(String),

    /// A migration source could not enumerate or instantiate its definitions.
    #[error("migration source error: {0}")]
    Source(String),
}

/// A convenience type alias for `Result<T, MigrationError>`.
pub type MigrationResult<T> = Result<T, MigrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = MigrationError::Configuration("version token must not be empty".into());
        assert_eq!(
            err.to_string(),
            "configuration error: version token must not be empty"
        );
    }

    #[test]
    fn test_not_implemented_display() {
        let err = MigrationError::NotImplemented("can_migrate_database".into());
        assert_eq!(err.to_string(), "not implemented: can_migrate_database");
    }

    #[test]
    fn test_execution_display() {
        let err = MigrationError::Execution("record is not an object".into());
        assert_eq!(err.to_string(), "migration failed: record is not an object");
    }

    #[test]
    fn test_source_display() {
        let err = MigrationError::Source("cannot read directory".into());
        assert_eq!(err.to_string(), "migration source error: cannot read directory");
    }
}
