//! Cart service: full-replace carts keyed by user id.

use tracing::info;

use styler_core::cart::{filter_cart_items, CartItemDraft};
use styler_core::CartItem;
use styler_db::Database;

use super::{require_user, ServiceResult};

/// Cart operations. Every call first checks that the user exists.
#[derive(Debug, Clone)]
pub struct CartService {
    db: Database,
}

impl CartService {
    pub fn new(db: Database) -> Self {
        CartService { db }
    }

    /// The user's current cart; empty when nothing was saved.
    pub async fn get(&self, user_id: i64) -> ServiceResult<Vec<CartItem>> {
        require_user(&self.db, user_id).await?;
        Ok(self.db.carts().list(user_id).await?)
    }

    /// Filters `drafts` and makes the result the user's whole cart.
    ///
    /// Lines without a product id or with a non-positive quantity are
    /// dropped; a negative price rejects the request.
    pub async fn replace(
        &self,
        user_id: i64,
        drafts: Vec<CartItemDraft>,
    ) -> ServiceResult<Vec<CartItem>> {
        require_user(&self.db, user_id).await?;

        let received = drafts.len();
        let items = filter_cart_items(drafts)?;
        let stored = self.db.carts().replace(user_id, &items).await?;

        info!(user_id, received, stored = stored.len(), "Cart replaced");
        Ok(stored)
    }

    /// Empties the cart. Clearing an empty cart is fine.
    pub async fn clear(&self, user_id: i64) -> ServiceResult<()> {
        require_user(&self.db, user_id).await?;
        self.db.carts().clear(user_id).await?;
        Ok(())
    }
}
