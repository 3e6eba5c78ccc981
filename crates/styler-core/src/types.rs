//! # Domain Types
//!
//! Core domain types used throughout the Styler backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌──────────────────────────────────────┐   │
//! │  │      User       │ 1    * │               Order                  │   │
//! │  │  ─────────────  │───────►│  ──────────────────────────────────  │   │
//! │  │  id (i64)       │        │  order_id "ORD-<millis>-<8 hex>"     │   │
//! │  │  email (unique) │        │  status, totals, dates               │   │
//! │  │  password       │        │  ├── ShippingAddress (exactly one)   │   │
//! │  │  profile        │        │  └── OrderItem[] (ordered)           │   │
//! │  └────────┬────────┘        └──────────────────────────────────────┘   │
//! │           │ 1                                                           │
//! │           │                                                             │
//! │           ▼ *                  ┌─────────────────┐                      │
//! │  ┌─────────────────┐           │  OrderStatus    │                      │
//! │  │    CartItem     │           │  CONFIRMED      │                      │
//! │  │  full-replace   │           │  PROCESSING     │                      │
//! │  │  per user       │           │  SHIPPED        │                      │
//! │  └─────────────────┘           │  DELIVERED      │                      │
//! │                                │  CANCELLED      │                      │
//! │                                └─────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Order exclusively owns its items and address. User is referenced, never owned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// User
// =============================================================================

/// A registered storefront account.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Stored exactly as produced by the active `CredentialVerifier`.
    #[serde(skip)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    /// Set once at registration.
    #[ts(as = "String")]
    pub join_date: DateTime<Utc>,
    /// Updated on every successful login.
    #[ts(as = "Option<String>")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// "First Last", without stray spaces when a part is empty.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Account data accepted at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Partial profile change. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl ProfileUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone.is_none()
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in a user's current cart.
///
/// The cart is always the full set of rows for a user; there is no
/// per-line update, only [`replace`](crate::cart) of the whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub id: i64,
    pub product_id: i64,
    pub product_name: Option<String>,
    #[ts(type = "number")]
    pub price: Money,
    pub quantity: i64,
    pub color: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

/// A cart line that passed filtering and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_id: i64,
    pub product_name: Option<String>,
    pub price: Money,
    pub quantity: i64,
    pub color: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of an order.
///
/// ## Transitions
/// Any status may be replaced by any other; there is no transition graph.
/// Only `Delivered` has a side effect (stamping `actual_delivery`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum OrderStatus {
    /// Initial state of every new order.
    #[default]
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every member of the closed set, in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Wire and storage spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether moving into this status records the delivery time.
    pub const fn records_delivery(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }

    /// Comma-separated list for error messages.
    pub fn allowed_list() -> String {
        OrderStatus::ALL
            .iter()
            .map(OrderStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; surrounding whitespace is ignored.
impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
    }
}

// =============================================================================
// Shipping Address
// =============================================================================

/// Delivery address owned by exactly one order.
///
/// `landmark` doubles as an overflow slot; the HTTP layer stores the
/// contact phone there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address_line_1: String,
    pub address_line_2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub landmark: String,
}

impl ShippingAddress {
    /// Single-line rendering: `line1[, line2], city, state postal[ (landmark)]`.
    ///
    /// ## Example
    /// ```rust
    /// use styler_core::ShippingAddress;
    ///
    /// let address = ShippingAddress {
    ///     address_line_1: "12 Market Road".to_string(),
    ///     address_line_2: "Flat 4".to_string(),
    ///     city: "Pune".to_string(),
    ///     state: "MH".to_string(),
    ///     postal_code: "411001".to_string(),
    ///     ..ShippingAddress::default()
    /// };
    /// assert_eq!(address.full_address(), "12 Market Road, Flat 4, Pune, MH 411001");
    /// ```
    pub fn full_address(&self) -> String {
        let mut out = self.address_line_1.clone();
        if !self.address_line_2.trim().is_empty() {
            out.push_str(", ");
            out.push_str(&self.address_line_2);
        }
        out.push_str(&format!(", {}, {} {}", self.city, self.state, self.postal_code));
        if !self.landmark.trim().is_empty() {
            out.push_str(&format!(" ({})", self.landmark));
        }
        out
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A priced line of an order.
///
/// ## Invariant
/// `price > 0` and `quantity >= 1`, checked before the order is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItem {
    pub product_id: i64,
    pub product_name: String,
    pub product_category: String,
    #[ts(type = "number")]
    pub price: Money,
    pub quantity: i64,
    pub color: String,
    pub size: String,
    pub image_url: String,
}

impl OrderItem {
    /// `price × quantity`, `None` when it exceeds the representable range.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A persisted order with its address and lines.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: i64,
    /// Business identifier, immutable once minted.
    pub order_id: String,
    pub user_id: i64,
    #[ts(type = "number")]
    pub total_amount: Money,
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub shipping_cost: Money,
    #[ts(type = "number")]
    pub tax_amount: Money,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub estimated_delivery: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub actual_delivery: Option<DateTime<Utc>>,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Number of lines (not units).
    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("delivered".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
        assert_eq!(" Shipped ".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert_eq!("CANCELLED".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        let err = "PENDING".parse::<OrderStatus>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatus(s) if s == "PENDING"));
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"PROCESSING\"");
        assert_eq!(OrderStatus::default(), OrderStatus::Confirmed);
    }

    #[test]
    fn test_only_delivered_records_delivery() {
        for status in OrderStatus::ALL {
            assert_eq!(status.records_delivery(), status == OrderStatus::Delivered);
        }
    }

    #[test]
    fn test_full_address_with_landmark_and_no_line_two() {
        let address = ShippingAddress {
            address_line_1: "221B Baker Street".to_string(),
            city: "London".to_string(),
            state: "LDN".to_string(),
            postal_code: "NW1".to_string(),
            landmark: "9876543210".to_string(),
            ..ShippingAddress::default()
        };
        assert_eq!(
            address.full_address(),
            "221B Baker Street, London, LDN NW1 (9876543210)"
        );
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            price: Money::from_cents(1250),
            quantity: 3,
            ..OrderItem::default()
        };
        assert_eq!(item.line_total(), Some(Money::from_cents(3750)));

        let bulk = OrderItem {
            price: Money::from_cents(10_000_000_000_000_000),
            quantity: 1000,
            ..OrderItem::default()
        };
        assert_eq!(bulk.line_total(), None);
    }

    #[test]
    fn test_display_name_trims_missing_last_name() {
        let user = User {
            id: 1,
            email: "a@x.com".to_string(),
            password: "pw".to_string(),
            first_name: "Asha".to_string(),
            last_name: String::new(),
            phone: None,
            join_date: Utc::now(),
            last_login: None,
        };
        assert_eq!(user.display_name(), "Asha");
        assert!(serde_json::to_value(&user).unwrap().get("password").is_none());
    }
}
