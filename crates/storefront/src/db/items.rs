//! Item repository: catalog writes and the filtered, paginated listing.

use chrono::Utc;

use shopfront_core::{ItemId, ItemStatus};

use super::{Entity, Store, StoreError, Tables};
use crate::models::{Item, ItemFilter, ItemPage, NewItem};

/// Repository for catalog operations.
pub struct ItemRepository<'a> {
    store: &'a Store,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Create an item. Status defaults to `active`.
    pub fn create(&self, new_item: NewItem) -> Item {
        self.store.write(|tables| create_in(tables, new_item))
    }

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item doesn't exist.
    pub fn get(&self, id: ItemId) -> Result<Item, StoreError> {
        self.store.read(|tables| {
            tables
                .item(id)
                .cloned()
                .ok_or(StoreError::NotFound(Entity::Item))
        })
    }

    /// Change an item's status, the only mutable item attribute.
    ///
    /// Lines already in carts stay; the new status only gates future adds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item doesn't exist.
    pub fn set_status(&self, id: ItemId, status: ItemStatus) -> Result<Item, StoreError> {
        self.store.write(|tables| {
            let item = tables
                .item_mut(id)
                .ok_or(StoreError::NotFound(Entity::Item))?;
            item.status = status;
            Ok(item.clone())
        })
    }

    /// Delete an item and every cart line that references it.
    ///
    /// Returns the number of cart lines removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item doesn't exist.
    pub fn delete(&self, id: ItemId) -> Result<usize, StoreError> {
        let (item, removed_lines) = self.store.write(|tables| tables.remove_item(id))?;
        tracing::info!(item_id = %id, name = %item.name, removed_lines, "item deleted");
        Ok(removed_lines)
    }

    /// One page of items matching `filter`, in ID order.
    #[must_use]
    pub fn list(&self, filter: &ItemFilter) -> ItemPage {
        self.store.read(|tables| list_in(tables, filter))
    }
}

pub(crate) fn create_in(tables: &mut Tables, new_item: NewItem) -> Item {
    let item = Item {
        id: ItemId::new(tables.next_id()),
        name: new_item.name.trim().to_owned(),
        status: new_item.status.unwrap_or_default(),
        image: new_item
            .image
            .map(|image| image.trim().to_owned())
            .filter(|image| !image.is_empty()),
        created_at: Utc::now(),
    };
    tables.insert_item(item.clone());
    item
}

fn list_in(tables: &Tables, filter: &ItemFilter) -> ItemPage {
    let page = filter.page();
    let per_page = filter.limit();

    let matching: Vec<&Item> = tables.items().filter(|item| filter.matches(item)).collect();
    let total = matching.len();
    let items = matching
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .cloned()
        .collect();

    ItemPage {
        items,
        total,
        page,
        per_page,
        total_pages: total.div_ceil(per_page),
    }
}
