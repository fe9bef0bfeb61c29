//! # caravan
//!
//! A storage-agnostic data migration engine. Discrete migration units, each
//! tagged with a comparable version, are collected into a registry and
//! applied in ascending version order, either to a whole dataset through a
//! caller-supplied storage adapter or to individual records one at a time.
//!
//! ## Architecture
//!
//! - [`Version`] is the ordered token that identifies a unit and drives
//!   chain order and deduplication.
//! - [`Migration`] is the unit contract: database-level hooks driving an
//!   adapter, and object-level dispatch through a handler table.
//! - [`RecordHandlers`] maps record type names to applicability predicates
//!   and transforms, validated when built.
//! - [`Record`] supplies the type tag the dispatch resolves on; an impl for
//!   `serde_json::Value` ships with the crate.
//! - [`Registry`] holds the units sorted and deduplicated by version and
//!   walks a pending chain in one call.
//! - [`StorageAdapter`] is the minimal contract persisted storage exposes
//!   to the engine; [`MemoryAdapter`] is the bundled in-memory impl.
//! - [`MigrationSource`] enumerates units for registration;
//!   [`StaticSource`] serves a fixed in-code list.
//!
//! ## Module Overview
//!
//! - [`version`] - `Version` token, ordering, the dated naming helper
//! - [`error`] - `MigrationError`, `MigrationResult`
//! - [`record`] - `Record` trait and the JSON value impl
//! - [`handlers`] - `RecordHandlers`, its builder, type-name sanitizing
//! - [`migration`] - the `Migration` trait
//! - [`registry`] - `Registry` and chain execution
//! - [`adapter`] - `StorageAdapter`, `MemoryAdapter`
//! - [`source`] - `MigrationSource`, `StaticSource`

// Clippy overrides appropriate for a generic migration engine crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::return_self_not_must_use)]

pub mod adapter;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod record;
pub mod registry;
pub mod source;
pub mod version;

// Re-export key types at the crate root.
pub use adapter::{MemoryAdapter, StorageAdapter};
pub use error::{MigrationError, MigrationResult};
pub use handlers::{PredicateFn, RecordHandlers, RecordHandlersBuilder, TransformFn};
pub use migration::Migration;
pub use record::Record;
pub use registry::Registry;
pub use source::{MigrationSource, StaticSource};
pub use version::Version;
