//! Admin-only listings.

use axum::extract::State;

use shopfront_core::CartId;

use crate::error::Result;
use crate::extract::{Json, Path};
use crate::middleware::RequireAdmin;
use crate::models::{CartView, OrderView, User};
use crate::state::AppState;

/// All users. Password hashes are never serialized.
pub async fn users(State(state): State<AppState>, _admin: RequireAdmin) -> Json<Vec<User>> {
    Json(state.users().list())
}

/// All carts with their items.
pub async fn carts(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<CartView>>> {
    Ok(Json(state.carts().all_carts()?))
}

/// One cart with its items.
pub async fn cart(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<CartId>,
) -> Result<Json<CartView>> {
    Ok(Json(state.carts().cart_by_id(id)?))
}

/// All orders, newest first.
pub async fn orders(State(state): State<AppState>, _admin: RequireAdmin) -> Json<Vec<OrderView>> {
    Json(state.orders().all_orders())
}
