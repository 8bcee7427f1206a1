//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_lifecycle` - Cart operations across users and item states
//! - `order_conversion` - Cart-to-order conversion end to end
//! - `concurrency` - Invariants under concurrent callers
//! - `http_api` - The JSON API driven through the router
//!
//! Everything runs in-process against a fresh store per test; no server or
//! external service is needed.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use shopfront_core::{HashedPassword, ItemId, UserId, UserRole, Username};
use shopfront_storefront::config::StorefrontConfig;
use shopfront_storefront::db::seed::{self, DEFAULT_ADMIN_PASSWORD};
use shopfront_storefront::db::{ItemRepository, Store, UserRepository};
use shopfront_storefront::models::ItemFilter;
use shopfront_storefront::routes;
use shopfront_storefront::services::auth::hash_password;
use shopfront_storefront::state::AppState;

// =============================================================================
// Store Fixtures
// =============================================================================

/// A placeholder hash for users that never log in.
#[must_use]
pub fn dummy_hash() -> HashedPassword {
    HashedPassword::new("$argon2id$v=19$m=19456,t=2,p=1$unused$unused".to_string())
}

/// A store holding the seed catalog and the admin account.
#[must_use]
pub fn seeded_store() -> Store {
    let store = Store::new();
    seed::seed(&store, dummy_hash());
    store
}

/// Register a customer directly through the repository.
#[must_use]
pub fn register(store: &Store, username: &str) -> UserId {
    UserRepository::new(store)
        .register(Username::parse(username).unwrap(), dummy_hash(), UserRole::Customer)
        .unwrap()
        .id
}

/// ID of a seeded item by exact name.
#[must_use]
pub fn item_named(store: &Store, name: &str) -> ItemId {
    ItemRepository::new(store)
        .list(&ItemFilter {
            search: Some(name.to_string()),
            limit: Some(100),
            ..ItemFilter::default()
        })
        .items
        .into_iter()
        .find(|item| item.name == name)
        .unwrap()
        .id
}

// =============================================================================
// HTTP Client
// =============================================================================

/// A response with its body parsed as JSON (`Null` when empty).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Drives the router in-process and keeps the session cookie like a browser.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
    client_ip: Option<String>,
}

impl TestClient {
    /// A client for `router`, with no session.
    #[must_use]
    pub const fn new(router: Router) -> Self {
        Self {
            router,
            cookie: None,
            client_ip: None,
        }
    }

    /// Send every request as if from `ip`, via `X-Forwarded-For`.
    #[must_use]
    pub fn from_ip(mut self, ip: &str) -> Self {
        self.client_ip = Some(ip.to_string());
        self
    }

    /// Another client on the same app, with its own cookie jar.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self::new(self.router.clone())
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(Method::POST, uri, body).await
    }

    /// POST a body as-is, for malformed JSON.
    pub async fn post_raw(&mut self, uri: &str, body: &str) -> TestResponse {
        self.send_body(Method::POST, uri, Some(body.to_string()))
            .await
    }

    pub async fn patch(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Log in, panicking unless it succeeds.
    pub async fn login(&mut self, username: &str, password: &str) -> Value {
        let response = self
            .post(
                "/auth/login",
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.body
    }

    /// Register and log in, returning the user JSON.
    pub async fn sign_up(&mut self, username: &str, password: &str) -> Value {
        let response = self
            .post(
                "/auth/register",
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "register failed: {:?}",
            response.body
        );
        self.login(username, password).await
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.send_body(method, uri, body.map(|json| json.to_string()))
            .await
    }

    async fn send_body(&mut self, method: Method, uri: &str, body: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(ip) = &self.client_ip {
            builder = builder.header("x-forwarded-for", ip);
        }
        let request = match body {
            Some(text) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(text))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        self.remember_cookie(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    fn remember_cookie(&mut self, headers: &HeaderMap) {
        let Some(set_cookie) = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        else {
            return;
        };

        if set_cookie
            .split(';')
            .any(|attr| attr.trim().eq_ignore_ascii_case("Max-Age=0"))
        {
            self.cookie = None;
        } else if let Some(pair) = set_cookie.split(';').next() {
            self.cookie = Some(pair.trim().to_string());
        }
    }
}

/// The full app on a seeded store whose admin password is the default.
#[must_use]
pub fn test_app() -> (TestClient, Store) {
    let store = Store::new();
    seed::seed(&store, hash_password(DEFAULT_ADMIN_PASSWORD).unwrap());
    let state = AppState::new(StorefrontConfig::default(), store.clone());
    (TestClient::new(routes::app(state)), store)
}

/// Like [`test_app`], but with the per-IP rate limiters the binary uses.
#[must_use]
pub fn rate_limited_test_app() -> (TestClient, Store) {
    let store = seeded_store();
    let state = AppState::new(StorefrontConfig::default(), store.clone());
    (TestClient::new(routes::rate_limited_app(state)), store)
}
