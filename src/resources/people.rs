//! `GET /people/{id}`: a character's first name, last name, and species.

use std::sync::{Arc, LazyLock};

use serde_json::{Map, Value, json};

use super::{first_url, id_input, id_rules, upstream};
use crate::ApiError;
use crate::app::AppState;
use crate::model::{Field, KeySource, Kind, Model, Record, Schema};
use crate::request::Request;
use crate::response::Json;
use crate::swapi::{Swapi, Target};

pub const NOT_FOUND: &str = "No people exists for the given id. Please try again with different id";

static PEOPLE_PARAMS: LazyLock<Schema> = LazyLock::new(|| Schema::new("PeopleParams", id_rules()));

static PERSON_RESPONSE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("PersonResponse", vec![
        Field::new("firstName", "first_name").required().kinds(&[Kind::String]),
        Field::new("lastName", "last_name").kinds(&[Kind::String]),
        Field::new("species", "species").required().kinds(&[Kind::String]),
    ])
});

#[derive(Debug)]
pub struct PeopleParams(Record);

impl Model for PeopleParams {
    fn schema() -> &'static Schema { &PEOPLE_PARAMS }
    fn from_record(record: Record) -> Self { Self(record) }
    fn record(&self) -> &Record { &self.0 }
}

impl PeopleParams {
    pub fn id(&self) -> u64 {
        self.0.value("id").and_then(Value::as_u64).unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct PersonResponse(Record);

impl Model for PersonResponse {
    fn schema() -> &'static Schema { &PERSON_RESPONSE }
    fn from_record(record: Record) -> Self { Self(record) }
    fn record(&self) -> &Record { &self.0 }
}

impl PersonResponse {
    pub fn first_name(&self) -> Option<&str> { self.0.str("first_name") }
    pub fn last_name(&self) -> Option<&str> { self.0.str("last_name") }
    pub fn species(&self) -> Option<&str> { self.0.str("species") }
}

/// Route handler.
pub async fn show(req: Request, state: Arc<AppState>) -> Result<Json<Map<String, Value>>, ApiError> {
    let params = PeopleParams::hydrate(Some(&id_input(&req)), KeySource::Wire)
        .map_err(ApiError::InvalidParams)?;
    let person = fetch(state.swapi(), params.id()).await?;
    Ok(Json(person.values()))
}

/// Fetches a person, then their first listed species, and binds both.
pub async fn fetch(swapi: &dyn Swapi, id: u64) -> Result<PersonResponse, ApiError> {
    let route = format!("/people/{id}/");
    let person = swapi
        .get(Target::Route(&route))
        .await
        .map_err(|e| upstream(e, NOT_FOUND))?;

    let species = match first_url(&person, "species") {
        Some(url) => swapi.get(Target::Url(url)).await?.get("name").cloned(),
        None => None,
    };

    let full_name = person.get("name").and_then(Value::as_str).unwrap_or_default();
    let (first, last) = split_name(full_name)
        .ok_or_else(|| ApiError::Internal(format!("person {id} has no name")))?;

    let data = json!({ "firstName": first, "lastName": last, "species": species });
    Ok(PersonResponse::hydrate(Some(&data), KeySource::Storage)?)
}

/// First word, and last word when there is more than one.
///
/// `"Wicket W Warrick"` gives `("Wicket", Some("Warrick"))`; `"R2-D2"` gives
/// `("R2-D2", None)`.
pub fn split_name(full_name: &str) -> Option<(&str, Option<&str>)> {
    if full_name.is_empty() {
        return None;
    }
    let mut words = full_name.split(' ');
    let first = words.next()?;
    Some((first, words.last()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swapi::Fixtures;

    const BASE: &str = "https://swapi.test/api";

    fn fixtures() -> Fixtures {
        Fixtures::new(BASE)
            .with(format!("{BASE}/people/1/"), json!({
                "name": "Luke Skywalker",
                "species": [format!("{BASE}/species/1/")],
            }))
            .with(format!("{BASE}/people/2/"), json!({
                "name": "C-3PO",
                "species": [format!("{BASE}/species/2/")],
            }))
            .with(format!("{BASE}/people/99/"), json!({"name": "Nameless", "species": []}))
            .with(format!("{BASE}/people/98/"), json!({"name": "", "species": []}))
            .with(format!("{BASE}/species/1/"), json!({"name": "Human"}))
            .with(format!("{BASE}/species/2/"), json!({"name": "Droid"}))
    }

    #[test]
    fn splits_names() {
        assert_eq!(split_name("Luke Skywalker"), Some(("Luke", Some("Skywalker"))));
        assert_eq!(split_name("Wicket W Warrick"), Some(("Wicket", Some("Warrick"))));
        assert_eq!(split_name("R2-D2"), Some(("R2-D2", None)));
        assert_eq!(split_name(""), None);
    }

    #[tokio::test]
    async fn binds_person_and_species() {
        let person = fetch(&fixtures(), 1).await.unwrap();
        assert_eq!(person.first_name(), Some("Luke"));
        assert_eq!(person.last_name(), Some("Skywalker"));
        assert_eq!(person.species(), Some("Human"));
        assert_eq!(
            Value::Object(person.values()),
            json!({"first_name": "Luke", "last_name": "Skywalker", "species": "Human"})
        );
    }

    #[tokio::test]
    async fn single_word_name_has_no_last_name() {
        let person = fetch(&fixtures(), 2).await.unwrap();
        assert_eq!(Value::Object(person.values()), json!({"first_name": "C-3PO", "species": "Droid"}));
    }

    #[tokio::test]
    async fn missing_species_fails_the_response_model() {
        let err = fetch(&fixtures(), 99).await.unwrap_err();
        assert!(matches!(&err, ApiError::InvalidResponse(e) if e.field() == "species"));
    }

    #[tokio::test]
    async fn empty_name_is_internal() {
        assert!(matches!(fetch(&fixtures(), 98).await, Err(ApiError::Internal(_))));
    }

    #[tokio::test]
    async fn unknown_person_is_not_found() {
        assert!(matches!(fetch(&fixtures(), 7).await, Err(ApiError::NotFound(NOT_FOUND))));
    }

    #[test]
    fn wire_input_round_trips_to_storage_keys() {
        let input = json!({"first_name": "Luke", "last_name": "Skywalker", "species": "Human"});
        let person = PersonResponse::hydrate(Some(&input), KeySource::Wire).unwrap();
        assert_eq!(Value::Object(person.values()), input);
        assert_eq!(
            Value::Object(person.storage_values()),
            json!({"firstName": "Luke", "lastName": "Skywalker", "species": "Human"})
        );
    }

    #[test]
    fn params_reject_non_numeric_ids() {
        let err = PeopleParams::hydrate(Some(&json!({"id": "abc"})), KeySource::Wire).unwrap_err();
        assert_eq!(err.message(), "id requires number but string provided");
        let err = PeopleParams::hydrate(Some(&json!({"id": 0})), KeySource::Wire).unwrap_err();
        assert_eq!(err.message(), "id is invalid");
        assert_eq!(PeopleParams::hydrate(Some(&json!({"id": 4})), KeySource::Wire).unwrap().id(), 4);
    }
}
