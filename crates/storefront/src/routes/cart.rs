//! Cart route handlers.
//!
//! Every handler acts on the caller's active cart.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopfront_core::ItemId;

use crate::error::{Result, add_breadcrumb};
use crate::extract::{Json, Path};
use crate::middleware::RequireAuth;
use crate::models::CartView;
use crate::state::AppState;

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub item_id: ItemId,
}

/// Response to clearing the cart.
#[derive(Debug, Serialize)]
pub struct Cleared {
    pub removed: usize,
}

/// Show the active cart.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartView>> {
    Ok(Json(state.carts().list_cart(user.id)?))
}

/// Add an item to the active cart.
#[instrument(skip_all, fields(user_id = %user.id, item_id = %body.item_id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddToCart>,
) -> Result<impl IntoResponse> {
    let line = state.carts().add_item(user.id, body.item_id)?;

    let item_id = body.item_id.to_string();
    add_breadcrumb("cart", "Item added", Some(&[("item_id", item_id.as_str())]));

    Ok((StatusCode::CREATED, Json(line)))
}

/// Remove an item from the active cart.
#[instrument(skip_all, fields(user_id = %user.id, item_id = %item_id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<ItemId>,
) -> Result<StatusCode> {
    state.carts().remove_item(user.id, item_id)?;

    let item_id = item_id.to_string();
    add_breadcrumb("cart", "Item removed", Some(&[("item_id", item_id.as_str())]));

    Ok(StatusCode::NO_CONTENT)
}

/// Remove every line from the active cart.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Cleared>> {
    let removed = state.carts().clear_cart(user.id)?;
    add_breadcrumb("cart", "Cart cleared", None);

    Ok(Json(Cleared { removed }))
}
