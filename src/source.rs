//! Migration discovery.
//!
//! Units reach the [`Registry`](crate::Registry) through a
//! [`MigrationSource`]: an explicit enumerate-then-register step, so the
//! full set of known migrations is always visible in code rather than
//! assembled as an import side effect. [`StaticSource`] is the bundled
//! implementation for units constructed up front.

use std::sync::Arc;

use crate::error::MigrationResult;
use crate::migration::Migration;
use crate::record::Record;

/// Enumerates migration units for registration.
///
/// A source owns the construction (and therefore the validation) of its
/// units and hands them over fully built. Implementations must enumerate in
/// a deterministic order; the registry sorts by version anyway, but
/// determinism keeps load counts and logs reproducible. Construction or
/// discovery failures surface as [`MigrationError::Source`].
///
/// [`MigrationError::Source`]: crate::MigrationError::Source
pub trait MigrationSource<A, R: Record> {
    /// Returns every unit this source provides.
    fn migrations(&self) -> MigrationResult<Vec<Arc<dyn Migration<A, R>>>>;
}

/// A source over a fixed, pre-built list of units.
///
/// The in-code analogue of a migrations directory: the embedder lists the
/// units once, in insertion order, and the same source can feed repeated
/// [`Registry::load`](crate::Registry::load) calls across resets.
pub struct StaticSource<A, R: Record> {
    units: Vec<Arc<dyn Migration<A, R>>>,
}

impl<A, R: Record> StaticSource<A, R> {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    /// Adds a unit, consuming and returning the source for chaining.
    pub fn with(mut self, unit: Arc<dyn Migration<A, R>>) -> Self {
        self.units.push(unit);
        self
    }

    /// Adds a unit in place.
    pub fn push(&mut self, unit: Arc<dyn Migration<A, R>>) {
        self.units.push(unit);
    }

    /// Returns the number of units held.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns whether the source holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl<A, R: Record> Default for StaticSource<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R: Record> MigrationSource<A, R> for StaticSource<A, R> {
    fn migrations(&self) -> MigrationResult<Vec<Arc<dyn Migration<A, R>>>> {
        Ok(self.units.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::Value;

    use crate::error::MigrationError;
    use crate::version::Version;

    struct Stamp {
        version: Version,
    }

    impl Stamp {
        fn unit(token: &str) -> Arc<dyn Migration<(), Value>> {
            Arc::new(Self {
                version: Version::new(token).unwrap(),
            })
        }
    }

    impl Migration<(), Value> for Stamp {
        fn version(&self) -> &Version {
            &self.version
        }
    }

    struct Broken;

    impl MigrationSource<(), Value> for Broken {
        fn migrations(&self) -> MigrationResult<Vec<Arc<dyn Migration<(), Value>>>> {
            Err(MigrationError::Source(
                "migrations directory unreadable".into(),
            ))
        }
    }

    fn versions_of(source: &dyn MigrationSource<(), Value>) -> Vec<String> {
        source
            .migrations()
            .unwrap()
            .iter()
            .map(|unit| unit.version().to_string())
            .collect()
    }

    #[test]
    fn test_empty_source() {
        let source: StaticSource<(), Value> = StaticSource::new();
        assert!(source.is_empty());
        assert_eq!(source.len(), 0);
        assert!(source.migrations().unwrap().is_empty());
    }

    #[test]
    fn test_preserves_insertion_order() {
        let source = StaticSource::new()
            .with(Stamp::unit("2024_03_01_c"))
            .with(Stamp::unit("2024_01_01_a"));
        assert_eq!(versions_of(&source), vec!["2024_03_01_c", "2024_01_01_a"]);
    }

    #[test]
    fn test_push_appends() {
        let mut source = StaticSource::new().with(Stamp::unit("2024_01_01_a"));
        source.push(Stamp::unit("2024_02_01_b"));
        assert_eq!(source.len(), 2);
        assert_eq!(versions_of(&source), vec!["2024_01_01_a", "2024_02_01_b"]);
    }

    #[test]
    fn test_repeated_enumeration_is_stable() {
        let source = StaticSource::new()
            .with(Stamp::unit("2024_01_01_a"))
            .with(Stamp::unit("2024_02_01_b"));
        assert_eq!(versions_of(&source), versions_of(&source));
    }

    #[test]
    fn test_failing_source_reports_source_error() {
        let err = Broken.migrations().err().expect("source should fail");
        assert!(matches!(err, MigrationError::Source(_)));
    }
}
