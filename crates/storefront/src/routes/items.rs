//! Catalog route handlers.

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use shopfront_core::{ItemId, ItemStatus};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::{Json, Path, Query};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{Item, ItemFilter, ItemPage, NewItem};
use crate::state::AppState;

/// Pagination headers mirrored from the listing body.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
pub const TOTAL_PAGES_HEADER: &str = "x-total-pages";
pub const CURRENT_PAGE_HEADER: &str = "x-current-page";
pub const PER_PAGE_HEADER: &str = "x-per-page";

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// List items.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> impl IntoResponse {
    let page = state.items().list(&filter);
    (pagination_headers(&page), Json(page))
}

/// Show one item.
pub async fn show(State(state): State<AppState>, Path(id): Path<ItemId>) -> Result<Json<Item>> {
    Ok(Json(state.items().get(id)?))
}

/// Create an item.
#[instrument(skip_all, fields(user_id = %user.id, name = %new_item.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(new_item): Json<NewItem>,
) -> Result<impl IntoResponse> {
    if new_item.name.trim().is_empty() {
        return Err(AppError::BadRequest("Item name is required".to_string()));
    }

    let item = state.items().create(new_item);
    tracing::info!(item_id = %item.id, "item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Change an item's status.
#[instrument(skip_all, fields(admin_id = %admin.id, item_id = %id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ItemId>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Item>> {
    if update.status.trim().is_empty() {
        return Err(AppError::BadRequest("Status is required".to_string()));
    }

    let item = state
        .items()
        .set_status(id, ItemStatus::from(update.status))?;
    let item_id = id.to_string();
    add_breadcrumb(
        "catalog",
        "Item status changed",
        Some(&[("item_id", item_id.as_str()), ("status", item.status.as_str())]),
    );

    Ok(Json(item))
}

/// Delete an item.
#[instrument(skip_all, fields(admin_id = %admin.id, item_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ItemId>,
) -> Result<StatusCode> {
    state.items().delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn pagination_headers(page: &ItemPage) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in [
        (TOTAL_COUNT_HEADER, page.total),
        (TOTAL_PAGES_HEADER, page.total_pages),
        (CURRENT_PAGE_HEADER, page.page),
        (PER_PAGE_HEADER, page.per_page),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
    }
    headers
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_headers() {
        let page = ItemPage {
            items: Vec::new(),
            total: 45,
            page: 2,
            per_page: 20,
            total_pages: 3,
        };

        let headers = pagination_headers(&page);
        assert_eq!(headers.get(TOTAL_COUNT_HEADER).unwrap(), "45");
        assert_eq!(headers.get(TOTAL_PAGES_HEADER).unwrap(), "3");
        assert_eq!(headers.get(CURRENT_PAGE_HEADER).unwrap(), "2");
        assert_eq!(headers.get(PER_PAGE_HEADER).unwrap(), "20");
    }
}
