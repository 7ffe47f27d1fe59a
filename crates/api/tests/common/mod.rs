#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use watchparty_api::auth::jwt::{generate_access_token, JwtConfig};
use watchparty_api::config::{ServerConfig, WatchPartyConfig};
use watchparty_api::router::build_app_router;
use watchparty_api::state::AppState;
use watchparty_db::catalog::SqlCatalog;

pub const PUBLIC_BASE_URL: &str = "http://localhost:5173";

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        public_base_url: PUBLIC_BASE_URL.to_string(),
        jwt: test_jwt_config(),
        watch_party: WatchPartyConfig::default(),
    }
}

/// Build the full application router against `pool` with the default test
/// configuration.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Build the full application router with a custom configuration.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        catalog: Arc::new(SqlCatalog::new(pool.clone())),
        pool,
        config: Arc::new(config),
    };
    build_app_router(state)
}

/// Mint a valid bearer token for `user_id`.
pub fn token_for(user_id: i64) -> String {
    generate_access_token(user_id, &test_jwt_config()).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Catalog fixtures
// ---------------------------------------------------------------------------

/// Insert a movie into the catalog and return its id.
pub async fn seed_movie(pool: &PgPool, title: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO contents (title, content_type) VALUES ($1, 'movie') RETURNING id",
    )
    .bind(title)
    .fetch_one(pool)
    .await
    .expect("movie insert should succeed")
}

/// Insert a series with a single episode and return `(series_id, episode_id)`.
pub async fn seed_episode(pool: &PgPool, series: &str, episode: &str) -> (i64, i64) {
    let series_id: i64 = sqlx::query_scalar(
        "INSERT INTO contents (title, content_type) VALUES ($1, 'series') RETURNING id",
    )
    .bind(series)
    .fetch_one(pool)
    .await
    .expect("series insert should succeed");

    let episode_id: i64 = sqlx::query_scalar(
        "INSERT INTO episodes (content_id, season_number, episode_number, title) \
         VALUES ($1, 1, 1, $2) RETURNING id",
    )
    .bind(series_id)
    .bind(episode)
    .fetch_one(pool)
    .await
    .expect("episode insert should succeed");

    (series_id, episode_id)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request as `user_id`.
pub async fn get_auth(app: Router, uri: &str, user_id: i64) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token_for(user_id)))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body as `user_id`.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    user_id: i64,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token_for(user_id)))
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request without a body as `user_id`.
pub async fn post_auth(app: Router, uri: &str, user_id: i64) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token_for(user_id)))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send an unauthenticated GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
