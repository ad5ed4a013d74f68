use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use recetas_core::{FakeProvider, MemoryStore, RecipeService};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{router, AppState};
use crate::config::{Environment, HttpConfig, RateLimit};

const CHICKEN_RICE: &str = "**Título:** Chicken Rice\n**Ingredientes:**\n- chicken\n- rice\n**Instrucciones:**\n1. Cook rice\n2. Add chicken";

fn app_with_http(
    provider: FakeProvider,
    environment: Environment,
    http: &HttpConfig,
) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        recipes: RecipeService::new(Arc::new(provider), store.clone()),
        environment,
    };
    (router(state, http), store)
}

fn app_with(provider: FakeProvider, environment: Environment) -> (Router, Arc<MemoryStore>) {
    app_with_http(provider, environment, &HttpConfig::default())
}

fn app() -> (Router, Arc<MemoryStore>) {
    app_with(
        FakeProvider::new().with_default_response(CHICKEN_RICE),
        Environment::Production,
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_generate_recipe_returns_created() {
    let (app, store) = app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/generate-recipe",
            json!({"ingredients": ["chicken", "rice"], "dietaryRestrictions": "sin gluten"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "Chicken Rice");
    assert_eq!(body["ingredients"], json!(["chicken", "rice"]));
    assert_eq!(body["instructions"], json!(["Cook rice", "Add chicken"]));
    assert_eq!(body["originalIngredients"], json!(["chicken", "rice"]));
    assert_eq!(body["likes"], 0);
    assert!(body["createdAt"].is_string());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_generate_recipe_accepts_comma_separated_ingredients() {
    let (app, _store) = app();

    let (status, body) = send(
        &app,
        post_json("/api/generate-recipe", json!({"ingredients": "pollo, arroz ,"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["originalIngredients"], json!(["pollo", "arroz"]));
}

#[tokio::test]
async fn test_generate_recipe_without_ingredients_is_bad_request() {
    let (app, store) = app();

    for payload in [json!({}), json!({"ingredients": []}), json!({"ingredients": " , "})] {
        let (status, body) = send(&app, post_json("/api/generate-recipe", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Debes proporcionar ingredientes");
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _store) = app();

    let request = Request::post("/api/generate-recipe")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "JSON inválido");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_generation_failure_hides_details_in_production() {
    // No default response, so every prompt fails.
    let (app, store) = app_with(FakeProvider::new(), Environment::Production);

    let (status, body) = send(
        &app,
        post_json("/api/generate-recipe", json!({"ingredients": ["sal"]})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Error al generar receta");
    assert!(body.get("details").is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_generation_failure_shows_details_in_development() {
    let (app, _store) = app_with(FakeProvider::new(), Environment::Development);

    let (status, body) = send(
        &app,
        post_json("/api/generate-recipe", json!({"ingredients": ["sal"]})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_list_recipes_paginates_with_cursor() {
    let (app, _store) = app();
    for _ in 0..3 {
        let (status, _) = send(
            &app,
            post_json("/api/generate-recipe", json!({"ingredients": ["sal"]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, first) = send(&app, get("/api/recipes?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"].as_array().unwrap().len(), 2);
    assert_eq!(first["data"][0]["id"], 3);
    assert_eq!(first["hasMore"], true);
    assert_eq!(first["nextCursor"], "2");

    let (_, second) = send(&app, get("/api/recipes?limit=2&cursor=2")).await;
    assert_eq!(second["data"].as_array().unwrap().len(), 1);
    assert_eq!(second["data"][0]["id"], 1);
    assert_eq!(second["hasMore"], false);
    assert_eq!(second["nextCursor"], Value::Null);

    let (_, legacy) = send(&app, get("/api/recipes?limit=2&lastId=2")).await;
    assert_eq!(legacy, second);
}

#[tokio::test]
async fn test_list_recipes_on_empty_store() {
    let (app, _store) = app();

    let (status, body) = send(&app, get("/api/recipes")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": [], "hasMore": false, "nextCursor": null}));
}

#[tokio::test]
async fn test_list_recipes_rejects_non_numeric_limit() {
    let (app, _store) = app();

    let (status, body) = send(&app, get("/api/recipes?limit=muchas")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_get_and_like_recipe() {
    let (app, _store) = app();
    send(
        &app,
        post_json("/api/generate-recipe", json!({"ingredients": ["sal"]})),
    )
    .await;

    let (status, body) = send(&app, get("/api/recipes/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 0);

    let (status, body) = send(&app, post_json("/api/recipes/1/like", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 1);

    let (status, body) = send(&app, get("/api/recipes/receta1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 1);
}

#[tokio::test]
async fn test_unknown_recipe_is_not_found() {
    let (app, _store) = app();

    for uri in ["/api/recipes/42", "/api/recipes/no-such-id"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["error"], "Receta no encontrada");
    }

    let (status, _) = send(&app, post_json("/api/recipes/42/like", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _store) = app();

    let (status, body) = send(&app, get("/api/nothing-here")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Endpoint no encontrado"}));
}

#[tokio::test]
async fn test_health() {
    let (app, _store) = app();

    let (status, body) = send(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["environment"], "production");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let (app, _store) = app();

    let request = Request::get("/api/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );

    let request = Request::get("/api/health")
        .header(header::ORIGIN, "https://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_rate_limit_returns_429_after_quota() {
    let http = HttpConfig {
        rate_limit: Some(RateLimit {
            max_requests: 2,
            window: Duration::from_secs(900),
            trust_proxy: false,
        }),
        ..HttpConfig::default()
    };
    let (app, _store) = app_with_http(
        FakeProvider::new().with_default_response(CHICKEN_RICE),
        Environment::Production,
        &http,
    );

    for _ in 0..2 {
        let response = app.clone().oneshot(get("/api/recipes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(get("/api/recipes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_rate_limit_can_be_disabled() {
    let http = HttpConfig {
        rate_limit: None,
        ..HttpConfig::default()
    };
    let (app, _store) = app_with_http(
        FakeProvider::new().with_default_response(CHICKEN_RICE),
        Environment::Production,
        &http,
    );

    for _ in 0..150 {
        let response = app.clone().oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_security_headers_present() {
    let (app, _store) = app();

    let response = app.clone().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");

    let response = app.oneshot(get("/api/nothing-here")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_security_headers_can_be_disabled() {
    let http = HttpConfig {
        security_headers: false,
        ..HttpConfig::default()
    };
    let (app, _store) = app_with_http(
        FakeProvider::new().with_default_response(CHICKEN_RICE),
        Environment::Production,
        &http,
    );

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert!(response.headers().get("x-content-type-options").is_none());
}

#[test]
fn test_openapi_lists_every_route() {
    let spec = super::openapi();
    for path in [
        "/api/generate-recipe",
        "/api/recipes",
        "/api/recipes/{id}",
        "/api/recipes/{id}/like",
        "/api/health",
    ] {
        assert!(spec.paths.paths.contains_key(path), "missing {}", path);
    }
}
