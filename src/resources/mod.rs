//! The two public resources.
//!
//! Each resource is a parameter model, a response model, and one handler that
//! walks the upstream API and binds what it found to the response model.

pub mod people;
pub mod planets;

use serde_json::{Value, json};

use crate::ApiError;
use crate::model::{Field, Kind};
use crate::request::Request;
use crate::swapi::SwapiError;

/// Rules shared by the `{id}` parameter models.
fn id_rules() -> Vec<Field> {
    vec![Field::new("id", "id").required().kinds(&[Kind::Number]).check(positive_integer)]
}

fn positive_integer(value: &Value) -> bool {
    value.as_u64().is_some_and(|n| n > 0)
}

/// `{"id": 42}` for `/…/42`. A non-numeric id is kept as a string so the
/// type rule reports it.
fn id_input(req: &Request) -> Value {
    let raw = req.param("id").unwrap_or_default();
    let id = raw.parse::<u64>().map_or_else(|_| Value::from(raw), Value::from);
    json!({ "id": id })
}

/// First URL of a list-of-URLs attribute, e.g. a person's `species`.
fn first_url<'a>(document: &'a Value, key: &str) -> Option<&'a str> {
    document.get(key)?.as_array()?.first()?.as_str()
}

/// A missing top-level resource is the client's problem; anything else
/// upstream is ours.
fn upstream(err: SwapiError, missing: &'static str) -> ApiError {
    if err.is_not_found() {
        ApiError::NotFound(missing)
    } else {
        ApiError::Upstream(err)
    }
}
