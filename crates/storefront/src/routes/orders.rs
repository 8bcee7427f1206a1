//! Order route handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use shopfront_core::OrderId;

use crate::error::{Result, add_breadcrumb};
use crate::extract::{Json, Path};
use crate::middleware::RequireAuth;
use crate::models::OrderView;
use crate::state::AppState;

/// Place an order from the active cart.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let order = state.orders().create_order(user.id)?;

    let order_id = order.order.id.to_string();
    add_breadcrumb("orders", "Order placed", Some(&[("order_id", order_id.as_str())]));

    Ok((StatusCode::CREATED, Json(order)))
}

/// The caller's orders, newest first.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<OrderView>>> {
    Ok(Json(state.orders().orders_for_user(user.id)?))
}

/// One of the caller's orders.
#[instrument(skip_all, fields(user_id = %user.id, order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    Ok(Json(state.orders().get_order(user.id, id)?))
}
