//! Catalog item types and listing filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfront_core::{ItemId, ItemStatus};

/// A catalog item.
///
/// Items are immutable once created, except for their status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub status: ItemStatus,
    /// Image path or URL, if the item has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewItem {
    pub name: String,
    /// Defaults to `active` when omitted.
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Item listing filter and pagination.
///
/// All text matching is case-insensitive substring matching.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    /// Matches against item name or status.
    pub search: Option<String>,
    /// Exact (case-insensitive) status match.
    pub status: Option<String>,
    /// Matches against item name; `all` disables the filter.
    pub category: Option<String>,
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size (1-100).
    pub limit: Option<i64>,
}

impl ItemFilter {
    /// Default page size.
    pub const DEFAULT_LIMIT: usize = 20;

    /// Largest accepted page size.
    pub const MAX_LIMIT: usize = 100;

    /// Effective page number; anything below 1 becomes 1.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
            .and_then(|p| usize::try_from(p).ok())
            .filter(|&p| p >= 1)
            .unwrap_or(1)
    }

    /// Effective page size; out-of-range values fall back to the default.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
            .and_then(|l| usize::try_from(l).ok())
            .filter(|l| (1..=Self::MAX_LIMIT).contains(l))
            .unwrap_or(Self::DEFAULT_LIMIT)
    }

    /// Whether `item` passes every filter.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        let name = item.name.to_lowercase();

        if let Some(category) = non_blank(self.category.as_deref())
            && !category.eq_ignore_ascii_case("all")
            && !name.contains(&category.to_lowercase())
        {
            return false;
        }

        if let Some(search) = non_blank(self.search.as_deref()) {
            let needle = search.to_lowercase();
            let status = item.status.as_str().to_lowercase();
            if !name.contains(&needle) && !status.contains(&needle) {
                return false;
            }
        }

        if let Some(status) = non_blank(self.status.as_deref())
            && !item.status.matches(status)
        {
            return false;
        }

        true
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// One page of an item listing.
#[derive(Debug, Clone, Serialize)]
pub struct ItemPage {
    pub items: Vec<Item>,
    /// Number of items matching the filter across all pages.
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}
