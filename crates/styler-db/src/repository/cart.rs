//! # Cart Repository
//!
//! A user's cart is the set of `cart_items` rows carrying their id.
//!
//! ## Full Replace
//! ```text
//! BEGIN
//!   DELETE FROM cart_items WHERE user_id = ?
//!   INSERT ... (one per line, in payload order)
//!   SELECT ... WHERE user_id = ?          ← what the caller gets back
//! COMMIT
//! ```
//! A concurrent reader sees either the old cart or the new one, never a mix.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use styler_core::{CartItem, NewCartItem};

const CART_SELECT: &str = r#"
    SELECT id, product_id, product_name, price, quantity, color, size, category, image
    FROM cart_items
    WHERE user_id = ?1
    ORDER BY id
"#;

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Current cart lines, in insertion order. Empty when the user has none.
    pub async fn list(&self, user_id: i64) -> DbResult<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(CART_SELECT)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Atomically swaps the user's cart for `items`.
    ///
    /// ## Returns
    /// The stored cart, with generated line ids.
    pub async fn replace(&self, user_id: i64, items: &[NewCartItem]) -> DbResult<Vec<CartItem>> {
        debug!(user_id, lines = items.len(), "Replacing cart");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO cart_items (
                    user_id, product_id, product_name, price, quantity,
                    color, size, category, image
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(user_id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.price)
            .bind(item.quantity)
            .bind(&item.color)
            .bind(&item.size)
            .bind(&item.category)
            .bind(&item.image)
            .execute(&mut *tx)
            .await?;
        }

        let stored = sqlx::query_as::<_, CartItem>(CART_SELECT)
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(stored)
    }

    /// Removes every line. Returns how many were deleted.
    pub async fn clear(&self, user_id: i64) -> DbResult<u64> {
        debug!(user_id, "Clearing cart");

        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
