//! # Order Assembly
//!
//! Builds a validated, ready-to-persist order from request data.
//!
//! ## Two Pricing Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderPricing::Itemized                OrderPricing::Simplified         │
//! │  ─────────────────────────             ──────────────────────────       │
//! │  subtotal       (given)                total_amount (given, or          │
//! │  shipping_cost  (given)                              Σ price × qty)     │
//! │  tax_amount     (given)                subtotal      = total_amount     │
//! │  total_amount = sum of the three       shipping_cost = 0                │
//! │                                        tax_amount    = 0                │
//! │                                        payment_method (default "COD")   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two paths are deliberately not reconciled: a simplified order reports
//! zero shipping and tax even when the storefront charged them.
//!
//! ## Lifecycle
//! ```text
//! NewOrder::itemized / NewOrder::simplified
//!      │  validate address, every item, every amount
//!      │  mint order_id, status = CONFIRMED, estimated = now + 5 days
//!      ▼
//! OrderRepository::create  (one transaction: order + address + items)
//!      ▼
//! Order
//! ```

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{OrderItem, OrderStatus, ShippingAddress};
use crate::validation::{validate_address, validate_non_negative, validate_order_item};
use crate::{DEFAULT_PAYMENT_METHOD, ESTIMATED_DELIVERY_DAYS};

// =============================================================================
// Order Id
// =============================================================================

/// Mints a business order id: `ORD-<epoch-millis>-<8 uppercase hex chars>`.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use styler_core::order::generate_order_id;
///
/// let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
/// let id = generate_order_id(at);
/// assert!(id.starts_with("ORD-1700000000123-"));
/// assert_eq!(id.len(), "ORD-1700000000123-".len() + 8);
/// ```
pub fn generate_order_id(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", now.timestamp_millis(), random[..8].to_uppercase())
}

// =============================================================================
// Pricing
// =============================================================================

/// How an order's amounts are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderPricing {
    /// Caller supplies the components; the total is always their sum.
    Itemized {
        subtotal: Money,
        shipping_cost: Money,
        tax_amount: Money,
    },
    /// Caller supplies (at most) a total; shipping and tax are zero.
    Simplified {
        total_amount: Option<Money>,
        payment_method: String,
    },
}

/// The four persisted amounts of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
}

impl OrderPricing {
    /// Resolves the amounts for the given lines.
    pub fn totals(&self, items: &[OrderItem]) -> CoreResult<OrderTotals> {
        match self {
            OrderPricing::Itemized {
                subtotal,
                shipping_cost,
                tax_amount,
            } => {
                validate_non_negative("subtotal", *subtotal)?;
                validate_non_negative("shippingCost", *shipping_cost)?;
                validate_non_negative("taxAmount", *tax_amount)?;

                let total_amount = Money::checked_sum([*subtotal, *shipping_cost, *tax_amount])
                    .ok_or_else(|| too_large("totalAmount"))?;

                Ok(OrderTotals {
                    subtotal: *subtotal,
                    shipping_cost: *shipping_cost,
                    tax_amount: *tax_amount,
                    total_amount,
                })
            }
            OrderPricing::Simplified { total_amount, .. } => {
                let total = match total_amount {
                    Some(total) => *total,
                    None => items
                        .iter()
                        .map(OrderItem::line_total)
                        .try_fold(Money::zero(), |sum, line| sum.checked_add(line?))
                        .ok_or_else(|| too_large("totalAmount"))?,
                };
                validate_non_negative("totalAmount", total)?;

                Ok(OrderTotals {
                    subtotal: total,
                    shipping_cost: Money::zero(),
                    tax_amount: Money::zero(),
                    total_amount: total,
                })
            }
        }
    }

    fn payment_method(&self) -> Option<String> {
        match self {
            OrderPricing::Itemized { .. } => None,
            OrderPricing::Simplified { payment_method, .. } => Some(payment_method.clone()),
        }
    }
}

fn too_large(field: &str) -> CoreError {
    ValidationError::TooLarge {
        field: field.to_string(),
    }
    .into()
}

// =============================================================================
// New Order
// =============================================================================

/// An order that passed every invariant and only needs persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_id: String,
    pub user_id: i64,
    pub totals: OrderTotals,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    pub order_date: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    /// Itemized creation: `total = subtotal + shipping_cost + tax_amount`.
    #[allow(clippy::too_many_arguments)]
    pub fn itemized(
        user_id: i64,
        items: Vec<OrderItem>,
        shipping_address: ShippingAddress,
        subtotal: Money,
        shipping_cost: Money,
        tax_amount: Money,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let pricing = OrderPricing::Itemized {
            subtotal,
            shipping_cost,
            tax_amount,
        };
        Self::build(user_id, items, shipping_address, pricing, now)
    }

    /// Simplified creation.
    ///
    /// ## Arguments
    /// * `total_amount` - Taken as-is when given, else Σ(price × quantity)
    /// * `payment_method` - Defaults to `"COD"`
    pub fn simplified(
        user_id: i64,
        items: Vec<OrderItem>,
        shipping_address: ShippingAddress,
        total_amount: Option<Money>,
        payment_method: Option<String>,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let payment_method = payment_method
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string());

        let pricing = OrderPricing::Simplified {
            total_amount,
            payment_method,
        };
        Self::build(user_id, items, shipping_address, pricing, now)
    }

    fn build(
        user_id: i64,
        items: Vec<OrderItem>,
        shipping_address: ShippingAddress,
        pricing: OrderPricing,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        validate_address(&shipping_address)?;

        for (index, item) in items.iter().enumerate() {
            validate_order_item(item).map_err(|e| CoreError::InvalidOrderItem {
                index,
                reason: e.to_string(),
            })?;
        }

        let totals = pricing.totals(&items)?;

        Ok(NewOrder {
            order_id: generate_order_id(now),
            user_id,
            totals,
            status: OrderStatus::Confirmed,
            payment_method: pricing.payment_method(),
            order_date: now,
            estimated_delivery: now + Duration::days(ESTIMATED_DELIVERY_DAYS),
            shipping_address,
            items,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price_cents: i64, quantity: i64) -> OrderItem {
        OrderItem {
            product_id: 1,
            product_name: "Kurta".to_string(),
            price: Money::from_cents(price_cents),
            quantity,
            ..OrderItem::default()
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Asha".to_string(),
            address_line_1: "12 Market Road".to_string(),
            city: "Pune".to_string(),
            ..ShippingAddress::default()
        }
    }

    #[test]
    fn test_order_id_format() {
        let id = generate_order_id(Utc::now());
        let parts: Vec<&str> = id.splitn(3, '-').collect();
        assert_eq!(parts[0], "ORD");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_order_ids_are_unique() {
        let now = Utc::now();
        assert_ne!(generate_order_id(now), generate_order_id(now));
    }

    #[test]
    fn test_simplified_sums_lines_when_total_missing() {
        let order =
            NewOrder::simplified(1, vec![item(1000, 2)], address(), None, None, Utc::now()).unwrap();

        assert_eq!(order.totals.total_amount, Money::from_cents(2000));
        assert_eq!(order.totals.subtotal, Money::from_cents(2000));
        assert_eq!(order.totals.shipping_cost, Money::zero());
        assert_eq!(order.totals.tax_amount, Money::zero());
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.payment_method.as_deref(), Some("COD"));
    }

    #[test]
    fn test_simplified_trusts_given_total() {
        let order = NewOrder::simplified(
            1,
            vec![item(1000, 2), item(499, 1)],
            address(),
            Some(Money::from_cents(2199)),
            Some("UPI".to_string()),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(order.totals.total_amount, Money::from_cents(2199));
        assert_eq!(order.totals.subtotal, Money::from_cents(2199));
        assert_eq!(order.payment_method.as_deref(), Some("UPI"));
    }

    #[test]
    fn test_itemized_total_is_sum_of_parts() {
        let order = NewOrder::itemized(
            1,
            vec![item(1000, 1)],
            address(),
            Money::from_cents(1000),
            Money::from_cents(99),
            Money::from_cents(180),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(order.totals.total_amount, Money::from_cents(1279));
        assert_eq!(order.payment_method, None);
    }

    #[test]
    fn test_itemized_rejects_negative_component() {
        let err = NewOrder::itemized(
            1,
            vec![item(1000, 1)],
            address(),
            Money::from_cents(1000),
            Money::from_cents(-1),
            Money::zero(),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "shippingCost must not be negative");
    }

    #[test]
    fn test_bad_item_rejects_whole_order() {
        let err = NewOrder::simplified(
            1,
            vec![item(1000, 1), item(0, 1)],
            address(),
            None,
            None,
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::InvalidOrderItem { index: 1, .. }));
    }

    #[test]
    fn test_overflowing_line_sum_is_rejected() {
        let err = NewOrder::simplified(
            1,
            vec![item(10_000_000_000_000_000, 1000)],
            address(),
            None,
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "totalAmount is too large");

        let err = NewOrder::simplified(
            1,
            vec![item(i64::MAX, 1), item(1, 1)],
            address(),
            None,
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "totalAmount is too large");
    }

    #[test]
    fn test_given_total_skips_line_sum() {
        let order = NewOrder::simplified(
            1,
            vec![item(10_000_000_000_000_000, 1000)],
            address(),
            Some(Money::from_cents(500)),
            None,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(order.totals.total_amount, Money::from_cents(500));
    }

    #[test]
    fn test_overflowing_itemized_total_is_rejected() {
        let err = NewOrder::itemized(
            1,
            vec![item(1000, 1)],
            address(),
            Money::from_cents(i64::MAX),
            Money::from_cents(1),
            Money::zero(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_missing_street_is_rejected() {
        let err = NewOrder::simplified(
            1,
            vec![item(1000, 1)],
            ShippingAddress::default(),
            None,
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "addressLine1 is required");
    }

    #[test]
    fn test_estimated_delivery_is_five_days_out() {
        let now = Utc::now();
        let order = NewOrder::simplified(1, vec![item(100, 1)], address(), None, None, now).unwrap();
        assert_eq!(order.order_date, now);
        assert_eq!(order.estimated_delivery - now, Duration::days(5));
    }
}
