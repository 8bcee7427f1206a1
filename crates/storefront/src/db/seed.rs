//! Deterministic start-up state.
//!
//! A fresh process begins with a fixed catalog and one administrative
//! account. Seeding is idempotent: the catalog is inserted only into an empty
//! item table and the admin account only when no `admin` user exists.

use shopfront_core::{HashedPassword, ItemStatus, UserRole, Username};

use super::{Store, Tables, items, users};
use crate::models::NewItem;

/// Username of the bootstrap administrator.
pub const ADMIN_USERNAME: &str = "admin";

/// Password of the bootstrap administrator unless configured otherwise.
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin@123";

/// Display name of the administrator's carts.
pub const ADMIN_CART_NAME: &str = "Admin Cart";

/// The seed catalog: (name, image path).
pub const SEED_ITEMS: &[(&str, &str)] = &[
    ("Laptop", "/assets/products/laptop.jpg"),
    ("Smartphone", "/assets/products/smartphone.jpg"),
    ("Headphones", "/assets/products/headphones.jpg"),
    ("Keyboard", "/assets/products/keyboard.jpg"),
    ("Mouse", "/assets/products/mouse.jpg"),
    ("Monitor", "/assets/products/monitor.jpg"),
    ("Tablet", "/assets/products/tablet.jpg"),
    ("Webcam", "/assets/products/webcam.jpg"),
];

/// What a seeding pass created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub items_created: usize,
    pub admin_created: bool,
}

/// Seed the catalog and the bootstrap administrator in one critical section.
pub fn seed(store: &Store, admin_password_hash: HashedPassword) -> SeedReport {
    let report = store.write(|tables| SeedReport {
        items_created: seed_items(tables),
        admin_created: seed_admin(tables, admin_password_hash),
    });

    if report.items_created > 0 {
        tracing::info!(count = report.items_created, "seeded catalog items");
    }
    if report.admin_created {
        tracing::info!(username = ADMIN_USERNAME, "created bootstrap admin account");
    } else {
        tracing::info!(username = ADMIN_USERNAME, "admin account already exists");
    }

    report
}

fn seed_items(tables: &mut Tables) -> usize {
    if tables.item_count() > 0 {
        return 0;
    }
    for (name, image) in SEED_ITEMS {
        items::create_in(
            tables,
            NewItem {
                name: (*name).to_owned(),
                status: Some(ItemStatus::Active),
                image: Some((*image).to_owned()),
            },
        );
    }
    SEED_ITEMS.len()
}

fn seed_admin(tables: &mut Tables, password_hash: HashedPassword) -> bool {
    let Ok(username) = Username::parse(ADMIN_USERNAME) else {
        return false;
    };
    if tables.user_by_username(&username).is_some() {
        return false;
    }
    users::register_in(
        tables,
        username,
        password_hash,
        UserRole::Admin,
        ADMIN_CART_NAME,
    )
    .is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::UserRepository;

    fn hash() -> HashedPassword {
        HashedPassword::new("$argon2id$admin".to_string())
    }

    #[test]
    fn test_seed_creates_catalog_and_admin() {
        let store = Store::new();
        let report = seed(&store, hash());
        assert_eq!(
            report,
            SeedReport {
                items_created: SEED_ITEMS.len(),
                admin_created: true,
            }
        );

        store.read(|tables| {
            let names: Vec<&str> = tables.items().map(|i| i.name.as_str()).collect();
            assert_eq!(names.first(), Some(&"Laptop"));
            assert_eq!(names.len(), 8);
            assert!(tables.items().all(|i| i.status == ItemStatus::Active));
        });

        let admin = UserRepository::new(&store)
            .find_by_username(&Username::parse("admin").unwrap())
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        store.read(|tables| {
            assert_eq!(tables.active_cart(admin.id).unwrap().name, "Admin Cart");
        });
    }

    #[test]
    fn test_seed_is_idempotent() {
        let store = Store::new();
        seed(&store, hash());
        let second = seed(&store, hash());
        assert_eq!(second, SeedReport::default());

        store.read(|tables| {
            assert_eq!(tables.item_count(), SEED_ITEMS.len());
            assert_eq!(tables.user_count(), 1);
            assert_eq!(tables.cart_count(), 1);
        });
    }
}
