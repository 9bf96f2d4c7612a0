//! In-process integration test harness for the Lungi Mart storefront.
//!
//! Tests drive the real router through `tower::ServiceExt::oneshot`, with
//! the seed catalog from `crates/storefront/data/catalog.json`, a mock
//! payment gateway, and manual session-cookie propagation between
//! requests. No network, no external services.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use lungi_mart_storefront::build_app;
use lungi_mart_storefront::config::StorefrontConfig;
use lungi_mart_storefront::services::MockPaymentGateway;
use lungi_mart_storefront::state::AppState;
use lungi_mart_storefront::store::CatalogStore;

/// The seed catalog shipped with the storefront crate.
const SEED_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../storefront/data/catalog.json"
);

/// One simulated browser: the app plus its session cookie.
pub struct TestApp {
    app: Router,
    cookie: Option<HeaderValue>,
}

impl TestApp {
    /// Build the full application against the seed catalog.
    ///
    /// # Panics
    ///
    /// Panics if the seed catalog cannot be loaded; the tests cannot run
    /// without it.
    #[must_use]
    pub fn new() -> Self {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("host"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("integration-test-session-secret-".repeat(2)),
            catalog_path: SEED_PATH.into(),
            sentry_dsn: None,
        };
        let (catalog, shoppers) =
            CatalogStore::load(Path::new(SEED_PATH)).expect("seed catalog loads");
        let state = AppState::new(
            config,
            catalog,
            shoppers,
            Arc::new(MockPaymentGateway::default()),
        );
        Self {
            app: build_app(state),
            cookie: None,
        }
    }

    /// A second browser against the same app (separate session).
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: None,
        }
    }

    /// Send a request, propagating the session cookie, and decode the body:
    /// JSON where possible, a plain string for text responses (the health
    /// endpoint), `Null` when there is no body at all.
    ///
    /// # Panics
    ///
    /// Panics on malformed requests; that indicates a broken test.
    pub async fn request(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie.clone());
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response.headers().get(SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .expect("cookie is ascii")
                .split(';')
                .next()
                .expect("cookie has a value")
                .to_string();
            self.cookie = Some(HeaderValue::from_str(&pair).expect("cookie header"));
        }

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Log in as one of the seeded shoppers.
    pub async fn login(&mut self, shopper_id: i32) {
        let (status, _) = self
            .post("/session", serde_json::json!({ "shopper_id": shopper_id }))
            .await;
        assert_eq!(status, StatusCode::OK, "login as shopper {shopper_id}");
    }

    /// Add a product to the session cart by id.
    pub async fn add_to_cart(&mut self, product_id: i32, quantity: u32) -> (StatusCode, Value) {
        self.post(
            "/cart/items",
            serde_json::json!({ "product_id": product_id, "quantity": quantity }),
        )
        .await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
