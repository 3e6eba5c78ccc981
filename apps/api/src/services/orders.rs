//! Order service: creation on both pricing paths, lookups, status changes
//! and sales aggregates.
//!
//! Order creation never reads the stored cart; items always come from the
//! caller.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use styler_core::order::NewOrder;
use styler_core::{CoreError, Money, Order, OrderItem, OrderStatus, ShippingAddress, ValidationError};
use styler_db::{Database, DbError};

use super::{require_user, ServiceResult};

/// Order operations.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
}

impl OrderService {
    pub fn new(db: Database) -> Self {
        OrderService { db }
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Itemized creation: the total is `subtotal + shipping_cost + tax_amount`.
    pub async fn create_order(
        &self,
        user_id: i64,
        items: Vec<OrderItem>,
        address: ShippingAddress,
        subtotal: Money,
        shipping_cost: Money,
        tax_amount: Money,
    ) -> ServiceResult<Order> {
        require_user(&self.db, user_id).await?;

        let new_order = NewOrder::itemized(
            user_id,
            items,
            address,
            subtotal,
            shipping_cost,
            tax_amount,
            Utc::now(),
        )?;
        Ok(self.db.orders().create(&new_order).await?)
    }

    /// Simplified creation: the given total (or the sum of the lines) with
    /// zero shipping and tax.
    pub async fn create_simple_order(
        &self,
        user_id: i64,
        items: Vec<OrderItem>,
        address: ShippingAddress,
        total_amount: Option<Money>,
        payment_method: Option<String>,
    ) -> ServiceResult<Order> {
        require_user(&self.db, user_id).await?;

        let new_order = NewOrder::simplified(
            user_id,
            items,
            address,
            total_amount,
            payment_method,
            Utc::now(),
        )?;
        Ok(self.db.orders().create(&new_order).await?)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub async fn find_by_order_id(&self, order_id: &str) -> ServiceResult<Option<Order>> {
        Ok(self.db.orders().find_by_order_id(order_id).await?)
    }

    /// A user's orders, newest first.
    pub async fn user_orders(&self, user_id: i64) -> ServiceResult<Vec<Order>> {
        require_user(&self.db, user_id).await?;
        Ok(self.db.orders().list_for_user(user_id).await?)
    }

    pub async fn all_orders(&self) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().list_all().await?)
    }

    /// Orders placed between `since` and now.
    pub async fn recent_orders(&self, since: DateTime<Utc>) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().placed_between(since, Utc::now()).await?)
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    pub async fn order_count(&self, since: DateTime<Utc>) -> ServiceResult<i64> {
        Ok(self.db.orders().count_since(since).await?)
    }

    /// Revenue from orders on or after `since`; zero when there are none.
    pub async fn total_revenue(&self, since: DateTime<Utc>) -> ServiceResult<Money> {
        Ok(self.db.orders().revenue_since(since).await?)
    }

    /// Whether the user ordered anything in the last `days` days.
    pub async fn has_recent_purchase(&self, user_id: i64, days: i64) -> ServiceResult<bool> {
        let since = Duration::try_days(days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "days".to_string(),
                reason: format!("{days} is out of range"),
            })?;
        Ok(self.db.orders().has_order_since(user_id, since).await?)
    }

    pub async fn lifetime_value(&self, user_id: i64) -> ServiceResult<Money> {
        Ok(self.db.orders().lifetime_value(user_id).await?)
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Moves an order to `status`.
    ///
    /// Any status may follow any other. Entering `DELIVERED` stamps the
    /// delivery time; nothing ever clears it.
    ///
    /// ## Errors
    /// * `OrderNotFound` - checked first
    /// * `InvalidStatus` - not one of the five known statuses
    pub async fn update_status(&self, order_id: &str, status: &str) -> ServiceResult<Order> {
        if self.db.orders().find_by_order_id(order_id).await?.is_none() {
            return Err(CoreError::OrderNotFound(order_id.to_string()).into());
        }

        let status: OrderStatus = status.parse()?;
        let delivered_at = status.records_delivery().then(Utc::now);

        let order = self
            .db
            .orders()
            .update_status(order_id, status, delivered_at)
            .await
            .map_err(|e| match e {
                DbError::NotFound { .. } => CoreError::OrderNotFound(order_id.to_string()).into(),
                other => super::ServiceError::from(other),
            })?;

        info!(order_id = %order_id, status = %status, "Order status updated");
        Ok(order)
    }
}
