//! Hydrated records: binding, validation, projection.

use std::ptr;

use serde_json::{Map, Value};
use tracing::warn;

use super::error::ValidationError;
use super::field::{Cardinality, Field, FieldType, Kind};
use super::{IDENTITY_KEY, Schema};

/// Which name a mapping is keyed by.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeySource {
    Wire,
    Storage,
}

impl KeySource {
    pub fn key(self, field: &Field) -> &'static str {
        match self {
            Self::Wire    => field.wire_name(),
            Self::Storage => field.storage_name(),
        }
    }
}

/// Result of a validation pass that found nothing wrong.
///
/// A schema without rules has nothing to validate; that is reported as
/// [`Outcome::NoRules`], distinct from a full pass.
#[must_use]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Passed,
    NoRules,
}

impl Outcome {
    pub fn is_passed(self) -> bool {
        self == Self::Passed
    }
}

// ── Slot ──────────────────────────────────────────────────────────────────────

/// The value held for one field.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    /// Never set: no input, no default.
    Absent,
    Value(Value),
    One(Box<Record>),
    Many(Vec<Record>),
}

impl Slot {
    /// Absent or `null`.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Absent | Self::Value(Value::Null))
    }

    /// Absent, `null`, `false`, `0` or `""`. Records and lists never are.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Value(value) => !truthy(value),
            Self::One(_) | Self::Many(_) => false,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The slot as plain JSON, nested records in their wire projection.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Value(value) => value.clone(),
            Self::One(record) => Value::Object(record.values()),
            Self::Many(records) => {
                Value::Array(records.iter().map(|r| Value::Object(r.values())).collect())
            }
        }
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// An entity bound to a [`Schema`], one [`Slot`] per field in rule order.
///
/// A record exclusively owns its nested records.
#[derive(Clone, Debug)]
pub struct Record {
    schema: &'static Schema,
    slots: Vec<Slot>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.schema, other.schema) && self.slots == other.slots
    }
}

impl Record {
    /// A record with every slot [`Slot::Absent`]. Not validated.
    pub fn empty(schema: &'static Schema) -> Self {
        Self { schema, slots: vec![Slot::Absent; schema.fields().len()] }
    }

    /// Binds `input` to `schema` and validates the result.
    ///
    /// `source` selects whether `input` is keyed by wire or storage names;
    /// nested records are read with the same choice. Fails on the first rule
    /// violation, nested or not; no partially valid record is returned.
    pub fn hydrate(
        schema: &'static Schema,
        input: Option<&Value>,
        source: KeySource,
    ) -> Result<Self, ValidationError> {
        let record = Self::hydrate_unchecked(schema, input, source);
        record.validate()?;
        Ok(record)
    }

    /// Binds `input` to `schema` without validating.
    ///
    /// With no input (or a `null` one) every slot stays absent, defaults
    /// unapplied, so the record can be filled in and validated later.
    pub fn hydrate_unchecked(schema: &'static Schema, input: Option<&Value>, source: KeySource) -> Self {
        let input = match input {
            None | Some(Value::Null) => return Self::empty(schema),
            Some(input) => input,
        };
        let slots = schema
            .fields()
            .iter()
            .map(|field| bind(field, input.get(source.key(field)), source))
            .collect();
        Self { schema, slots }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// The slot for a wire name, or `None` when the schema has no such field.
    pub fn get(&self, wire_name: &str) -> Option<&Slot> {
        self.schema.position(wire_name).map(|i| &self.slots[i])
    }

    /// The plain value for a wire name, if the slot holds one.
    pub fn value(&self, wire_name: &str) -> Option<&Value> {
        self.get(wire_name).and_then(Slot::as_value)
    }

    pub fn str(&self, wire_name: &str) -> Option<&str> {
        self.value(wire_name).and_then(Value::as_str)
    }

    /// Replaces a slot, returning the previous one. Nothing is re-validated.
    pub fn set(&mut self, wire_name: &str, slot: Slot) -> Option<Slot> {
        let i = self.schema.position(wire_name)?;
        Some(std::mem::replace(&mut self.slots[i], slot))
    }

    // ── Validation ────────────────────────────────────────────────────────────

    /// Checks nested records first, in field order, then every rule of this
    /// record in declaration order; the first failure wins.
    ///
    /// Nested records count as part of binding, so a bad nested record is
    /// reported ahead of an earlier failing rule of the parent. The failure
    /// is logged at WARN where it originates, once, under the failing
    /// schema's name.
    pub fn validate(&self) -> Result<Outcome, ValidationError> {
        if self.schema.fields().is_empty() {
            return Ok(Outcome::NoRules);
        }
        for nested in self.nested() {
            nested.validate().map(drop)?;
        }
        for (field, slot) in self.schema.fields().iter().zip(&self.slots) {
            if let Err(message) = check(field, slot) {
                let err = ValidationError::new(self.schema.name(), field.wire_name(), message);
                warn!(model = self.schema.name(), field = field.wire_name(), "{err}");
                return Err(err);
            }
        }
        Ok(Outcome::Passed)
    }

    fn nested(&self) -> impl Iterator<Item = &Record> {
        self.slots.iter().flat_map(|slot| match slot {
            Slot::One(record) => std::slice::from_ref(&**record),
            Slot::Many(records) => records.as_slice(),
            Slot::Absent | Slot::Value(_) => &[][..],
        })
    }

    // ── Projection ────────────────────────────────────────────────────────────

    /// Every field under its wire name. Absent fields are omitted.
    pub fn values(&self) -> Map<String, Value> {
        self.project(self.schema.fields(), KeySource::Wire)
    }

    /// Fields with a storage name under that name, identity key excluded.
    pub fn storage_values(&self) -> Map<String, Value> {
        let fields = self
            .schema
            .fields()
            .iter()
            .filter(|f| !f.storage_name().is_empty() && f.storage_name() != IDENTITY_KEY);
        self.project(fields, KeySource::Storage)
    }

    /// Projects the given fields, looked up by wire name, under `keys`.
    ///
    /// Never fails: fields unknown to this record's schema are skipped, and
    /// nested records are projected with the same key choice.
    pub fn project<'a>(
        &self,
        fields: impl IntoIterator<Item = &'a Field>,
        keys: KeySource,
    ) -> Map<String, Value> {
        let mut out = Map::new();
        for field in fields {
            let value = match self.get(field.wire_name()) {
                None | Some(Slot::Absent) => continue,
                Some(Slot::Value(value)) => value.clone(),
                Some(Slot::One(record)) => Value::Object(record.projected(keys)),
                Some(Slot::Many(records)) => Value::Array(
                    records.iter().map(|r| Value::Object(r.projected(keys))).collect(),
                ),
            };
            out.insert(keys.key(field).to_owned(), value);
        }
        out
    }

    fn projected(&self, keys: KeySource) -> Map<String, Value> {
        match keys {
            KeySource::Wire    => self.values(),
            KeySource::Storage => self.storage_values(),
        }
    }
}

// ── Binding ───────────────────────────────────────────────────────────────────

fn bind(field: &Field, raw: Option<&Value>, source: KeySource) -> Slot {
    match (field.field_type(), raw) {
        (FieldType::Nested { schema, cardinality }, Some(raw)) if truthy(raw) => {
            match (cardinality, raw) {
                (Cardinality::Repeated, Value::Array(items)) => Slot::Many(
                    items
                        .iter()
                        .map(|item| Record::hydrate_unchecked(schema, Some(item), source))
                        .collect(),
                ),
                (Cardinality::Repeated, item) => {
                    Slot::Many(vec![Record::hydrate_unchecked(schema, Some(item), source)])
                }
                // left as a plain value so validation rejects it
                (Cardinality::Single, Value::Array(_)) => Slot::Value(raw.clone()),
                (Cardinality::Single, item) => {
                    Slot::One(Box::new(Record::hydrate_unchecked(schema, Some(item), source)))
                }
            }
        }
        (_, Some(raw)) if field.accepts(Kind::Boolean) && !raw.is_null() => {
            Slot::Value(Value::Bool(truthy(raw)))
        }
        (_, Some(raw)) if !raw.is_null() => Slot::Value(raw.clone()),
        _ => field.default_value().cloned().map_or(Slot::Absent, Slot::Value),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ── Rule checks ───────────────────────────────────────────────────────────────

fn check(field: &Field, slot: &Slot) -> Result<(), String> {
    let name = field.wire_name();

    if field.is_required() && slot.is_missing() {
        return Err(format!("{name} is required"));
    }
    // optional and falsy: 0, "" and false skip every later check
    if !field.is_required() && slot.is_falsy() {
        return Ok(());
    }

    check_type(field, slot)?;

    if let Some(validator) = field.validator() {
        if !validator(&slot.to_value()) {
            return Err(format!("{name} is invalid"));
        }
    }

    if let Some(length) = measure(slot) {
        if let Some(min) = field.min_length().filter(|min| length < *min) {
            return Err(format!("{name} requires a minimum of {min} but {length} provided"));
        }
        if let Some(max) = field.max_length().filter(|max| length > *max) {
            return Err(format!("{name} cannot exceed {max} but {length} provided"));
        }
    }
    Ok(())
}

/// Nested records are already validated by the time this runs.
///
/// A mismatch names the kind of the whole value, so a list holding a
/// wrong element is reported as `object`.
fn check_type(field: &Field, slot: &Slot) -> Result<(), String> {
    let name = field.wire_name();
    let mismatch = |provided: Kind| format!("{name} requires {} but {provided} provided", field.field_type());

    match (field.field_type(), slot) {
        (FieldType::Nested { .. }, Slot::Value(value)) => return Err(mismatch(Kind::of(value))),
        (FieldType::Scalar(kinds), Slot::Value(value)) if !kinds.is_empty() => {
            let items = match value {
                Value::Array(items) => items.as_slice(),
                other => std::slice::from_ref(other),
            };
            if items.iter().any(|item| !kinds.contains(&Kind::of(item))) {
                return Err(mismatch(Kind::of(value)));
            }
        }
        (FieldType::Scalar(kinds), Slot::One(_) | Slot::Many(_))
            if !kinds.is_empty() && !kinds.contains(&Kind::Object) =>
        {
            return Err(mismatch(Kind::Object));
        }
        _ => {}
    }
    Ok(())
}

/// Characters for strings, the value itself for numbers, 1 for booleans.
/// Objects and lists have no length to bound.
fn measure(slot: &Slot) -> Option<f64> {
    match slot.as_value()? {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Number(n) => n.as_f64(),
        Value::Bool(_) => Some(1.0),
        _ => None,
    }
}
