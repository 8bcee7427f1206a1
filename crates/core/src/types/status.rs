//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Cart lifecycle status.
///
/// A cart moves from `Active` to `Ordered` exactly once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    #[default]
    Active,
    Ordered,
}

impl CartStatus {
    /// Whether the cart can still be modified.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Ordered => write!(f, "ordered"),
        }
    }
}

/// Item catalog status.
///
/// `active` and `available` are purchasable. Creators may set any other
/// free-text status (e.g. `discontinued`), which makes the item visible but
/// not addable to a cart. Serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    #[default]
    Active,
    Available,
    Other(String),
}

impl ItemStatus {
    /// Whether an item with this status may be added to a cart.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        matches!(self, Self::Active | Self::Available)
    }

    /// The status as it is displayed and compared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Available => "available",
            Self::Other(s) => s,
        }
    }

    /// Case-insensitive comparison against a raw status string.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(raw.trim())
    }
}

impl From<String> for ItemStatus {
    /// Known statuses are recognised case-insensitively; a blank status falls
    /// back to the purchasable default.
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("active") {
            Self::Active
        } else if trimmed.eq_ignore_ascii_case("available") {
            Self::Available
        } else {
            Self::Other(trimmed.to_owned())
        }
    }
}

impl From<&str> for ItemStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<ItemStatus> for String {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular shopper.
    #[default]
    Customer,
    /// Store administrator (bootstrap account).
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_status_purchasable() {
        assert!(ItemStatus::Active.is_purchasable());
        assert!(ItemStatus::Available.is_purchasable());
        assert!(!ItemStatus::from("discontinued").is_purchasable());
    }

    #[test]
    fn test_item_status_from_string() {
        assert_eq!(ItemStatus::from("ACTIVE"), ItemStatus::Active);
        assert_eq!(ItemStatus::from(" Available "), ItemStatus::Available);
        assert_eq!(ItemStatus::from(""), ItemStatus::Active);
        assert_eq!(
            ItemStatus::from("Sold Out"),
            ItemStatus::Other("Sold Out".to_string())
        );
    }

    #[test]
    fn test_item_status_matches_case_insensitively() {
        assert!(ItemStatus::Active.matches("Active"));
        assert!(ItemStatus::from("Sold Out").matches("sold out"));
        assert!(!ItemStatus::Available.matches("active"));
    }

    #[test]
    fn test_item_status_serde() {
        let json = serde_json::to_string(&ItemStatus::Available).unwrap();
        assert_eq!(json, "\"available\"");

        let other: ItemStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(other, ItemStatus::Other("archived".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"archived\"");
    }

    #[test]
    fn test_cart_status_serde() {
        assert_eq!(
            serde_json::to_string(&CartStatus::Ordered).unwrap(),
            "\"ordered\""
        );
        assert!(CartStatus::Active.is_active());
        assert!(!CartStatus::Ordered.is_active());
    }

    #[test]
    fn test_user_role_roundtrip() {
        for role in [UserRole::Customer, UserRole::Admin] {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("root".parse::<UserRole>().is_err());
    }
}
