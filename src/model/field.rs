//! Field descriptors.
//!
//! A [`Field`] is one immutable rule: which key an attribute travels under on
//! the wire, which key it is stored under, and what a valid value looks like.
//! Building one never validates its own arguments. Rules are declared once per
//! entity and read many times.

use std::fmt;

use serde_json::Value;

use super::Schema;

/// A custom predicate run against an attribute after the type check.
pub type Validator = fn(&Value) -> bool;

// ── Kind ──────────────────────────────────────────────────────────────────────

/// Primitive type tag of a JSON value, as seen by the type check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    String,
    Number,
    Boolean,
    Object,
}

impl Kind {
    /// Tags a value. `null` and arrays both report [`Kind::Object`].
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_)   => Self::Boolean,
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String  => "string",
            Self::Number  => "number",
            Self::Boolean => "boolean",
            Self::Object  => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── FieldType ─────────────────────────────────────────────────────────────────

/// How many nested records a nested field holds. Declared, never inferred
/// from the shape of the input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cardinality {
    /// Exactly one nested record. An array input is rejected at validation.
    Single,
    /// A list of nested records. A lone object is wrapped into a list of one.
    Repeated,
}

/// What a field accepts: plain JSON values of the listed kinds, or records of
/// another schema.
///
/// Displays as the comma-joined kinds (`string,object`) or the schema name.
#[derive(Clone, Copy)]
pub enum FieldType {
    /// An empty kind list accepts anything.
    Scalar(&'static [Kind]),
    Nested {
        schema: &'static Schema,
        cardinality: Cardinality,
    },
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kinds) => f.debug_tuple("Scalar").field(kinds).finish(),
            Self::Nested { schema, cardinality } => f
                .debug_struct("Nested")
                .field("schema", &schema.name())
                .field("cardinality", cardinality)
                .finish(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kinds) => {
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(kind.as_str())?;
                }
                Ok(())
            }
            Self::Nested { schema, .. } => f.write_str(schema.name()),
        }
    }
}

// ── Field ─────────────────────────────────────────────────────────────────────

/// One attribute rule.
///
/// ```rust
/// use holonet::model::{Field, Kind};
///
/// let first_name = Field::new("firstName", "first_name")
///     .required()
///     .kinds(&[Kind::String])
///     .at_most(64.0);
/// assert_eq!(first_name.wire_name(), "first_name");
/// ```
#[derive(Clone, Debug)]
pub struct Field {
    storage_name: &'static str,
    wire_name: &'static str,
    required: bool,
    field_type: FieldType,
    min_length: Option<f64>,
    max_length: Option<f64>,
    default_value: Option<Value>,
    validator: Option<Validator>,
}

impl Field {
    /// An optional field that accepts any value. `storage_name` may be empty.
    pub fn new(storage_name: &'static str, wire_name: &'static str) -> Self {
        Self {
            storage_name,
            wire_name,
            required: false,
            field_type: FieldType::Scalar(&[]),
            min_length: None,
            max_length: None,
            default_value: None,
            validator: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn kinds(mut self, kinds: &'static [Kind]) -> Self {
        self.field_type = FieldType::Scalar(kinds);
        self
    }

    pub fn nested(mut self, schema: &'static Schema, cardinality: Cardinality) -> Self {
        self.field_type = FieldType::Nested { schema, cardinality };
        self
    }

    /// Lower bound on the measured length (characters, or the number itself).
    pub fn at_least(mut self, min: f64) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Upper bound on the measured length.
    pub fn at_most(mut self, max: f64) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Value assigned when the input omits the key or carries `null`.
    pub fn defaults_to(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn check(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn storage_name(&self) -> &'static str { self.storage_name }
    pub fn wire_name(&self) -> &'static str { self.wire_name }
    pub fn is_required(&self) -> bool { self.required }
    pub fn field_type(&self) -> FieldType { self.field_type }
    pub fn min_length(&self) -> Option<f64> { self.min_length }
    pub fn max_length(&self) -> Option<f64> { self.max_length }
    pub fn default_value(&self) -> Option<&Value> { self.default_value.as_ref() }
    pub fn validator(&self) -> Option<Validator> { self.validator }

    /// Whether a scalar field lists `kind` among its accepted kinds.
    pub fn accepts(&self, kind: Kind) -> bool {
        match self.field_type {
            FieldType::Scalar(kinds) => kinds.contains(&kind),
            FieldType::Nested { .. } => false,
        }
    }
}
