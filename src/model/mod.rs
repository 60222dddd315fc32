//! Declarative response and parameter models.
//!
//! An entity is described by a [`Schema`]: a name and an ordered list of
//! [`Field`] rules. [`Record::hydrate`] binds an untyped JSON mapping to the
//! schema and validates it; [`Record::values`] and [`Record::storage_values`]
//! project it back out under wire or storage keys.
//!
//! ```rust
//! use std::sync::LazyLock;
//! use holonet::model::{Field, KeySource, Kind, Record, Schema};
//! use serde_json::json;
//!
//! static GREETING: LazyLock<Schema> = LazyLock::new(|| {
//!     Schema::new("Greeting", vec![
//!         Field::new("greetingText", "text").required().kinds(&[Kind::String]),
//!     ])
//! });
//!
//! let record = Record::hydrate(&GREETING, Some(&json!({"text": "hi"})), KeySource::Wire)?;
//! assert_eq!(record.storage_values()["greetingText"], "hi");
//! # Ok::<(), holonet::model::ValidationError>(())
//! ```

mod error;
mod field;
mod record;

use serde_json::{Map, Value};

pub use error::ValidationError;
pub use field::{Cardinality, Field, FieldType, Kind, Validator};
pub use record::{KeySource, Outcome, Record, Slot};

/// Storage name of the identity key. Never re-emitted by storage projection.
pub const IDENTITY_KEY: &str = "_id";

/// A named, ordered rule list. One per entity type, built once, never mutated.
#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: &'static str, fields: Vec<Field>) -> Self {
        Self { name, fields }
    }

    /// A new schema holding this schema's rules followed by `extra`.
    ///
    /// Composition is explicit: the base schema is left untouched.
    pub fn extend(&self, name: &'static str, extra: Vec<Field>) -> Self {
        let mut fields = self.fields.clone();
        fields.extend(extra);
        Self { name, fields }
    }

    pub fn name(&self) -> &'static str { self.name }
    pub fn fields(&self) -> &[Field] { &self.fields }

    pub(crate) fn position(&self, wire_name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.wire_name() == wire_name)
    }
}

/// A concrete entity backed by a [`Record`] of a fixed schema.
///
/// Implementors are thin newtypes: they name their schema and wrap the
/// record; hydration and projection come from the provided methods.
pub trait Model: Sized {
    fn schema() -> &'static Schema;

    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    /// Hydrates and validates a new instance.
    fn hydrate(input: Option<&Value>, source: KeySource) -> Result<Self, ValidationError> {
        Record::hydrate(Self::schema(), input, source).map(Self::from_record)
    }

    fn values(&self) -> Map<String, Value> {
        self.record().values()
    }

    fn storage_values(&self) -> Map<String, Value> {
        self.record().storage_values()
    }
}
