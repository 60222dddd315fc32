//! End-to-end routing against an in-memory upstream.

use holonet::config::LinksConfig;
use holonet::swapi::Fixtures;
use holonet::{AppState, Method, Request, Response, app};
use serde_json::{Value, json};

const BASE: &str = "https://swapi.test/api";

fn url(kind: &str, n: u32) -> String {
    format!("{BASE}/{kind}/{n}/")
}

fn galaxy() -> Fixtures {
    let mut fixtures = Fixtures::new(BASE)
        .with(url("species", 1), json!({"name": "Human"}))
        .with(url("species", 2), json!({"name": "Droid"}))
        .with(url("species", 9), json!({"name": "Ewok"}));

    let people = [
        (1, "Luke Skywalker", 1),
        (2, "C-3PO", 2),
        (3, "R2-D2", 2),
        (4, "Darth Vader", 1),
        (30, "Wicket Systri Warrick", 9),
    ];
    for (id, name, species) in people {
        fixtures = fixtures.with(url("people", id), json!({"name": name, "species": [url("species", species)]}));
    }

    // Tatooine: eight humans and two droids
    let tatooine: Vec<String> = (101..=110).map(|n| url("people", n)).collect();
    for n in 101..=108 {
        fixtures = fixtures.with(url("people", n), json!({"species": [url("species", 1)]}));
    }
    for n in 109..=110 {
        fixtures = fixtures.with(url("people", n), json!({"species": [url("species", 2)]}));
    }

    fixtures
        .with(url("planets", 1), json!({"name": "Tatooine", "residents": tatooine}))
        .with(url("planets", 4), json!({"name": "Hoth", "residents": []}))
        .with(url("planets", 7), json!({"name": "Endor", "residents": [url("people", 30)]}))
}

fn router(prefix: &str) -> holonet::Router<AppState> {
    let links = LinksConfig { api_prefix: prefix.to_owned(), ..LinksConfig::default() };
    app::router(AppState::new(galaxy()), &links)
}

async fn get(target: &str) -> Response {
    router("").call(Request::new(Method::Get, target)).await
}

fn json_body(res: &Response) -> Value {
    serde_json::from_slice(res.body()).expect("JSON body")
}

#[tokio::test]
async fn person_has_first_and_last_name_and_species() {
    let res = get("/people/1").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("content-type"), Some("application/json"));
    assert_eq!(
        json_body(&res),
        json!({"first_name": "Luke", "last_name": "Skywalker", "species": "Human"})
    );
}

#[tokio::test]
async fn person_without_last_name_omits_it() {
    let body = json_body(&get("/people/3").await);
    assert_eq!(body["first_name"], "R2-D2");
    assert!(body.get("last_name").is_none());

    assert_eq!(json_body(&get("/people/2").await), json!({"first_name": "C-3PO", "species": "Droid"}));
}

#[tokio::test]
async fn different_ids_give_different_people() {
    assert_eq!(
        json_body(&get("/people/4").await),
        json!({"first_name": "Darth", "last_name": "Vader", "species": "Human"})
    );
}

#[tokio::test]
async fn three_names_keep_first_and_last() {
    let body = json_body(&get("/people/30").await);
    assert_eq!(body["first_name"], "Wicket");
    assert_eq!(body["last_name"], "Warrick");
}

#[tokio::test]
async fn planet_counts_resident_species() {
    let res = get("/planets/1").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(json_body(&res), json!({"name": "Tatooine", "count": {"Human": 8, "Droid": 2}}));
}

#[tokio::test]
async fn planet_without_residents_has_empty_count() {
    assert_eq!(json_body(&get("/planets/4").await), json!({"name": "Hoth", "count": {}}));
    assert_eq!(json_body(&get("/planets/7").await), json!({"name": "Endor", "count": {"Ewok": 1}}));
}

#[tokio::test]
async fn invalid_ids_are_bad_requests() {
    let res = get("/people/luke").await;
    assert_eq!(res.status_code(), 400);
    assert_eq!(
        json_body(&res),
        json!({"error": true, "message": "id requires number but string provided"})
    );

    let res = get("/planets/0").await;
    assert_eq!(res.status_code(), 400);
    assert_eq!(json_body(&res)["message"], "id is invalid");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let res = get("/people/404").await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(json_body(&res)["message"], holonet::resources::people::NOT_FOUND);

    let res = get("/planets/404").await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(json_body(&res)["message"], holonet::resources::planets::NOT_FOUND);
}

#[tokio::test]
async fn unknown_routes_and_methods() {
    let res = get("/starships/9").await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(json_body(&res), json!({"error": true, "message": "Not Found"}));

    let res = router("").call(Request::new(Method::Delete, "/people/1")).await;
    assert_eq!(res.status_code(), 405);
}

#[tokio::test]
async fn api_prefix_moves_resources_but_not_probes() {
    let router = router("/v1");
    let res = router.call(Request::new(Method::Get, "/v1/planets/4")).await;
    assert_eq!(res.status_code(), 200);

    let res = router.call(Request::new(Method::Get, "/planets/4")).await;
    assert_eq!(res.status_code(), 404);

    let res = router.call(Request::new(Method::Get, "/healthz")).await;
    assert_eq!(res.body(), b"ok");
    let res = router.call(Request::new(Method::Get, "/readyz")).await;
    assert_eq!(res.body(), b"ready");
}
