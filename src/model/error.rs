//! Validation failure.

/// The first rule violation found while validating a record.
///
/// Carries the name of the schema whose rule failed (for nested records that
/// is the nested schema, not the parent) and the wire name of the field.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("validation failed for model {model} with message {message}")]
pub struct ValidationError {
    model: &'static str,
    field: &'static str,
    message: String,
}

impl ValidationError {
    pub(crate) fn new(model: &'static str, field: &'static str, message: String) -> Self {
        Self { model, field, message }
    }

    pub fn model(&self) -> &'static str { self.model }
    pub fn field(&self) -> &'static str { self.field }

    /// The rule message alone, e.g. `"last_name is required"`.
    pub fn message(&self) -> &str { &self.message }
}
