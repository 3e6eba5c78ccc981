//! # Order Repository
//!
//! Orders are stored across three tables and always read back whole.
//!
//! ## Write Path
//! ```text
//! create(&NewOrder)
//!   BEGIN
//!     INSERT orders              → rowid
//!     INSERT shipping_addresses  (order_id = rowid)
//!     INSERT order_items × N     (position = index in request)
//!   COMMIT                       ← any failure: nothing persisted
//! ```
//!
//! ## Read Path
//! ```text
//! OrderRow ──► + ShippingAddress (1) ──► + OrderItem[] ORDER BY position ──► Order
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use styler_core::order::NewOrder;
use styler_core::{Money, Order, OrderItem, OrderStatus, ShippingAddress};

const ORDER_COLUMNS: &str = r#"
    id, order_id, user_id, total_amount, subtotal, shipping_cost, tax_amount,
    status, payment_method, order_date, estimated_delivery, actual_delivery
"#;

/// The `orders` row on its own, before address and items are attached.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    order_id: String,
    user_id: i64,
    total_amount: Money,
    subtotal: Money,
    shipping_cost: Money,
    tax_amount: Money,
    status: OrderStatus,
    payment_method: Option<String>,
    order_date: DateTime<Utc>,
    estimated_delivery: DateTime<Utc>,
    actual_delivery: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self, shipping_address: ShippingAddress, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            order_id: self.order_id,
            user_id: self.user_id,
            total_amount: self.total_amount,
            subtotal: self.subtotal,
            shipping_cost: self.shipping_cost,
            tax_amount: self.tax_amount,
            status: self.status,
            payment_method: self.payment_method,
            order_date: self.order_date,
            estimated_delivery: self.estimated_delivery,
            actual_delivery: self.actual_delivery,
            shipping_address,
            items,
        }
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Persists an order with its address and items in one transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - `user_id` does not exist
    /// * `Err(DbError::UniqueViolation)` - order id collision
    pub async fn create(&self, order: &NewOrder) -> DbResult<Order> {
        debug!(order_id = %order.order_id, user_id = order.user_id, "Creating order");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO orders (
                order_id, user_id, total_amount, subtotal, shipping_cost, tax_amount,
                status, payment_method, order_date, estimated_delivery
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&order.order_id)
        .bind(order.user_id)
        .bind(order.totals.total_amount)
        .bind(order.totals.subtotal)
        .bind(order.totals.shipping_cost)
        .bind(order.totals.tax_amount)
        .bind(order.status)
        .bind(&order.payment_method)
        .bind(order.order_date)
        .bind(order.estimated_delivery)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("order_id", &order.order_id),
            other => other,
        })?;

        let row_id = result.last_insert_rowid();
        let address = &order.shipping_address;

        sqlx::query(
            r#"
            INSERT INTO shipping_addresses (
                order_id, first_name, last_name, address_line_1, address_line_2,
                city, state, postal_code, landmark
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(row_id)
        .bind(&address.first_name)
        .bind(&address.last_name)
        .bind(&address.address_line_1)
        .bind(&address.address_line_2)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.postal_code)
        .bind(&address.landmark)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    order_id, position, product_id, product_name, product_category,
                    price, quantity, color, size, image_url
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(row_id)
            .bind(position as i64)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(&item.product_category)
            .bind(item.price)
            .bind(item.quantity)
            .bind(&item.color)
            .bind(&item.size)
            .bind(&item.image_url)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            order_id = %order.order_id,
            total = %order.totals.total_amount,
            items = order.items.len(),
            "Order created"
        );

        Ok(Order {
            id: row_id,
            order_id: order.order_id.clone(),
            user_id: order.user_id,
            total_amount: order.totals.total_amount,
            subtotal: order.totals.subtotal,
            shipping_cost: order.totals.shipping_cost,
            tax_amount: order.totals.tax_amount,
            status: order.status,
            payment_method: order.payment_method.clone(),
            order_date: order.order_date,
            estimated_delivery: order.estimated_delivery,
            actual_delivery: None,
            shipping_address: order.shipping_address.clone(),
            items: order.items.clone(),
        })
    }

    /// Sets the status of an order, stamping `actual_delivery` when given.
    ///
    /// `delivered_at = None` leaves any earlier delivery time in place.
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        delivered_at: Option<DateTime<Utc>>,
    ) -> DbResult<Order> {
        debug!(order_id = %order_id, status = %status, "Updating order status");

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?2,
                actual_delivery = COALESCE(?3, actual_delivery)
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .bind(status)
        .bind(delivered_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        self.find_by_order_id(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Looks an order up by its business id.
    pub async fn find_by_order_id(&self, order_id: &str) -> DbResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ?1"
        ))
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => Ok(Some(hydrate(&mut *conn, row).await?)),
            None => Ok(None),
        }
    }

    /// A user's orders, newest first.
    pub async fn list_for_user(&self, user_id: i64) -> DbResult<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY order_date DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        hydrate_all(&mut *conn, rows).await
    }

    /// Every order, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_date DESC, id DESC"
        ))
        .fetch_all(&mut *conn)
        .await?;

        hydrate_all(&mut *conn, rows).await
    }

    /// Orders placed in `[since, until]`, newest first.
    pub async fn placed_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_date BETWEEN ?1 AND ?2 ORDER BY order_date DESC, id DESC"
        ))
        .bind(since)
        .bind(until)
        .fetch_all(&mut *conn)
        .await?;

        hydrate_all(&mut *conn, rows).await
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// Orders placed at or after `since`.
    pub async fn count_since(&self, since: DateTime<Utc>) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE order_date >= ?1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Sum of `total_amount` over orders placed at or after `since`.
    pub async fn revenue_since(&self, since: DateTime<Utc>) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE order_date >= ?1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    /// Whether the user placed any order at or after `since`.
    pub async fn has_order_since(&self, user_id: i64, since: DateTime<Utc>) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE user_id = ?1 AND order_date >= ?2)",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Sum of `total_amount` across all of a user's orders; zero when none.
    pub async fn lifetime_value(&self, user_id: i64) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }
}

/// Attaches the address and items to an order row.
async fn hydrate(conn: &mut SqliteConnection, row: OrderRow) -> DbResult<Order> {
    let address = sqlx::query_as::<_, ShippingAddress>(
        r#"
        SELECT first_name, last_name, address_line_1, address_line_2,
               city, state, postal_code, landmark
        FROM shipping_addresses
        WHERE order_id = ?1
        "#,
    )
    .bind(row.id)
    .fetch_optional(&mut *conn)
    .await?
    .unwrap_or_default();

    let items = sqlx::query_as::<_, OrderItem>(
        r#"
        SELECT product_id, product_name, product_category, price, quantity,
               color, size, image_url
        FROM order_items
        WHERE order_id = ?1
        ORDER BY position
        "#,
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(row.into_order(address, items))
}

async fn hydrate_all(conn: &mut SqliteConnection, rows: Vec<OrderRow>) -> DbResult<Vec<Order>> {
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        orders.push(hydrate(&mut *conn, row).await?);
    }
    Ok(orders)
}

// =============================================================================
// Unit Tests
// =============================================================================
