//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//!
//! # Auth (strict rate limit)
//! POST   /auth/register          - Create an account
//! POST   /auth/login             - Start a session
//! POST   /auth/logout            - End the session
//! GET    /auth/me                - Current user
//!
//! # Items
//! GET    /items                  - Filtered, paginated listing
//! POST   /items                  - Create an item (login)
//! GET    /items/{id}             - Item detail
//! DELETE /items/{id}             - Delete an item (admin)
//! PATCH  /items/{id}/status      - Change status (admin)
//!
//! # Cart (login)
//! GET    /cart                   - Active cart with items
//! DELETE /cart                   - Remove every line
//! POST   /cart/items             - Add an item
//! DELETE /cart/items/{item_id}   - Remove an item
//!
//! # Orders (login)
//! POST   /orders                 - Convert the active cart
//! GET    /orders                 - Own orders, newest first
//! GET    /orders/{id}            - One own order
//!
//! # Admin (admin)
//! GET    /admin/users            - All users
//! GET    /admin/carts            - All carts with items
//! GET    /admin/carts/{id}       - One cart with items
//! GET    /admin/orders           - All orders, newest first
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod items;
pub mod orders;

use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue, Method, header},
    middleware,
    routing::{delete, get, patch, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::error::AppError;
use crate::middleware::{
    api_rate_limiter, auth_rate_limiter, create_session_layer, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(items::index).post(items::create))
        .route("/{id}", get(items::show).delete(items::destroy))
        .route("/{id}/status", patch(items::update_status))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{item_id}", delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::users))
        .route("/carts", get(admin::carts))
        .route("/carts/{id}", get(admin::cart))
        .route("/orders", get(admin::orders))
}

/// Every API route except auth.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/items", item_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/admin", admin_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .merge(api_routes())
}

/// The full application without rate limiting.
///
/// Used by tests, which issue many requests from one (absent) client address.
pub fn app(state: AppState) -> Router {
    with_middleware(routes(), state)
}

/// The full application with per-IP rate limiting.
///
/// Requires the server to provide `ConnectInfo<SocketAddr>`.
pub fn rate_limited_app(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes().layer(auth_rate_limiter()))
        .merge(api_routes().layer(api_rate_limiter()));
    with_middleware(routes, state)
}

/// JSON 404 for paths no route matches.
async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Wrap routes in the shared middleware stack.
fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let cors = cors_layer(&state.config().allowed_origins);

    routes
        .fallback(not_found)
        .layer(session_layer)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// CORS for the configured front-end origins, with cookies.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|e| tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([
            HeaderName::from_static(items::TOTAL_COUNT_HEADER),
            HeaderName::from_static(items::TOTAL_PAGES_HEADER),
            HeaderName::from_static(items::CURRENT_PAGE_HEADER),
            HeaderName::from_static(items::PER_PAGE_HEADER),
        ])
}
