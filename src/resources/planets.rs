//! `GET /planets/{id}`: a planet's name and a tally of its residents' species.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use serde_json::{Map, Value, json};
use tracing::debug;

use super::{first_url, id_input, id_rules, upstream};
use crate::ApiError;
use crate::app::AppState;
use crate::model::{Field, KeySource, Kind, Model, Record, Schema};
use crate::request::Request;
use crate::response::Json;
use crate::swapi::{Swapi, SwapiError, Target};

pub const NOT_FOUND: &str = "No planet exists for the given id. Please try again with different id";

static PLANET_PARAMS: LazyLock<Schema> = LazyLock::new(|| Schema::new("PlanetParams", id_rules()));

static PLANET_RESPONSE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("PlanetResponse", vec![
        Field::new("speciesName", "name").required().kinds(&[Kind::String]),
        Field::new("speciesCount", "count").kinds(&[Kind::Object]).defaults_to(json!({})),
    ])
});

#[derive(Debug)]
pub struct PlanetParams(Record);

impl Model for PlanetParams {
    fn schema() -> &'static Schema { &PLANET_PARAMS }
    fn from_record(record: Record) -> Self { Self(record) }
    fn record(&self) -> &Record { &self.0 }
}

impl PlanetParams {
    pub fn id(&self) -> u64 {
        self.0.value("id").and_then(Value::as_u64).unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct PlanetResponse(Record);

impl Model for PlanetResponse {
    fn schema() -> &'static Schema { &PLANET_RESPONSE }
    fn from_record(record: Record) -> Self { Self(record) }
    fn record(&self) -> &Record { &self.0 }
}

impl PlanetResponse {
    pub fn name(&self) -> Option<&str> { self.0.str("name") }

    pub fn count(&self) -> Option<&Map<String, Value>> {
        self.0.value("count").and_then(Value::as_object)
    }
}

/// Route handler.
pub async fn show(req: Request, state: Arc<AppState>) -> Result<Json<Map<String, Value>>, ApiError> {
    let params = PlanetParams::hydrate(Some(&id_input(&req)), KeySource::Wire)
        .map_err(ApiError::InvalidParams)?;
    let planet = fetch(state.swapi(), params.id()).await?;
    Ok(Json(planet.values()))
}

/// Fetches a planet and tallies its residents' species.
///
/// A planet without residents gets the model's default, an empty tally.
pub async fn fetch(swapi: &dyn Swapi, id: u64) -> Result<PlanetResponse, ApiError> {
    let route = format!("/planets/{id}/");
    let planet = swapi
        .get(Target::Route(&route))
        .await
        .map_err(|e| upstream(e, NOT_FOUND))?;

    let residents: Vec<&str> = planet
        .get("residents")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let count = if residents.is_empty() {
        None
    } else {
        Some(tally_species(swapi, &residents).await?)
    };

    let data = json!({ "speciesName": planet.get("name"), "speciesCount": count });
    Ok(PlanetResponse::hydrate(Some(&data), KeySource::Storage)?)
}

/// Counts residents per species name, one upstream call in flight at a time.
///
/// Residents without a species are skipped.
pub async fn tally_species(
    swapi: &dyn Swapi,
    residents: &[&str],
) -> Result<BTreeMap<String, u64>, SwapiError> {
    let mut tally = BTreeMap::new();
    for resident in residents {
        let person = swapi.get(Target::Url(resident)).await?;
        let Some(url) = first_url(&person, "species") else {
            debug!(resident, "resident lists no species");
            continue;
        };
        let species = swapi.get(Target::Url(url)).await?;
        if let Some(name) = species.get("name").and_then(Value::as_str).filter(|n| !n.is_empty()) {
            *tally.entry(name.to_owned()).or_insert(0) += 1;
        }
    }
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swapi::Fixtures;

    const BASE: &str = "https://swapi.test/api";

    fn person(n: u32) -> String { format!("{BASE}/people/{n}/") }
    fn species(n: u32) -> String { format!("{BASE}/species/{n}/") }

    fn fixtures() -> Fixtures {
        Fixtures::new(BASE)
            .with(format!("{BASE}/planets/1/"), json!({
                "name": "Tatooine",
                "residents": [person(1), person(2), person(3), person(4)],
            }))
            .with(format!("{BASE}/planets/4/"), json!({"name": "Hoth", "residents": []}))
            .with(format!("{BASE}/planets/5/"), json!({"residents": []}))
            .with(format!("{BASE}/planets/6/"), json!({"name": "Dagobah", "residents": [person(9)]}))
            .with(person(1), json!({"species": [species(1)]}))
            .with(person(2), json!({"species": [species(2)]}))
            .with(person(3), json!({"species": [species(2)]}))
            .with(person(4), json!({"species": []}))
            .with(species(1), json!({"name": "Human"}))
            .with(species(2), json!({"name": "Droid"}))
    }

    #[tokio::test]
    async fn tallies_species_across_residents() {
        let swapi = fixtures();
        let planet = fetch(&swapi, 1).await.unwrap();
        assert_eq!(
            Value::Object(planet.values()),
            json!({"name": "Tatooine", "count": {"Human": 1, "Droid": 2}})
        );
        // planet, four residents, three species lookups
        assert_eq!(swapi.calls(), 8);
    }

    #[tokio::test]
    async fn no_residents_defaults_to_empty_count() {
        let planet = fetch(&fixtures(), 4).await.unwrap();
        assert_eq!(planet.name(), Some("Hoth"));
        assert_eq!(planet.count(), Some(&Map::new()));
        assert_eq!(Value::Object(planet.values()), json!({"name": "Hoth", "count": {}}));
    }

    #[tokio::test]
    async fn nameless_planet_fails_the_response_model() {
        let err = fetch(&fixtures(), 5).await.unwrap_err();
        assert!(matches!(&err, ApiError::InvalidResponse(e) if e.field() == "name"));
    }

    #[tokio::test]
    async fn broken_resident_link_is_an_upstream_failure() {
        let err = fetch(&fixtures(), 6).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn unknown_planet_is_not_found() {
        assert!(matches!(fetch(&fixtures(), 60).await, Err(ApiError::NotFound(NOT_FOUND))));
    }

    #[test]
    fn params_require_an_id() {
        let err = PlanetParams::hydrate(Some(&json!({})), KeySource::Wire).unwrap_err();
        assert_eq!(err.to_string(), "validation failed for model PlanetParams with message id is required");
    }
}
