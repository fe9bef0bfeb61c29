//! The record contract: how the engine derives a type tag from a value.
//!
//! The engine routes individual records to per-type handlers by a string
//! type name. [`Record::type_name`] supplies the default resolution; a
//! migration unit can override
//! [`Migration::record_type`](crate::Migration::record_type) when its data
//! carries the tag somewhere else (a field in a serialized document, say).

/// A value the engine can route to per-type migration handlers.
///
/// The engine never inspects a record beyond its type tag; everything else
/// about the representation (native struct, enum of domain types, dynamic
/// JSON document) is the embedder's business.
///
/// # Examples
///
/// ```
/// use caravan::Record;
///
/// enum Item {
///     Task { title: String },
///     Note { body: String },
/// }
///
/// impl Record for Item {
///     fn type_name(&self) -> &str {
///         match self {
///             Self::Task { .. } => "Task",
///             Self::Note { .. } => "Note",
///         }
///     }
/// }
///
/// let task = Item::Task { title: "write docs".into() };
/// let note = Item::Note { body: "buy milk".into() };
/// assert_eq!(task.type_name(), "Task");
/// assert_eq!(note.type_name(), "Note");
/// ```
pub trait Record {
    /// Returns the type name used to look up this record's handlers.
    fn type_name(&self) -> &str;
}

/// `serde_json::Value` records resolve their tag from the `"type"` field
/// when one is present as a string, falling back to the JSON kind name
/// (`"object"`, `"array"`, ...) so resolution is total.
impl Record for serde_json::Value {
    fn type_name(&self) -> &str {
        if let Some(tag) = self.get("type").and_then(serde_json::Value::as_str) {
            return tag;
        }
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}
