//! # Cart Payload Filtering
//!
//! A cart update is a full replace: the incoming list becomes the whole cart.
//! Before that happens the list is filtered:
//!
//! ```text
//! incoming line                       outcome
//! ─────────────────────────────────   ─────────────────────────
//! productId missing                   dropped silently
//! quantity missing or <= 0            dropped silently
//! price missing                       kept, price = 0
//! price < 0                           whole request rejected
//! ```

use serde::Deserialize;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::NewCartItem;
use crate::validation::ValidationResult;

/// One cart line as it arrives over the wire. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDraft {
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub price: Option<Money>,
    pub quantity: Option<i64>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl CartItemDraft {
    /// `None` when the line should be dropped.
    fn into_item(self) -> ValidationResult<Option<NewCartItem>> {
        let (Some(product_id), Some(quantity)) = (self.product_id, self.quantity) else {
            return Ok(None);
        };
        if quantity <= 0 {
            return Ok(None);
        }

        let price = self.price.unwrap_or_default();
        if price.is_negative() {
            return Err(ValidationError::Negative {
                field: "price".to_string(),
            });
        }

        Ok(Some(NewCartItem {
            product_id,
            product_name: self.product_name,
            price,
            quantity,
            color: self.color,
            size: self.size,
            category: self.category,
            image: self.image,
        }))
    }
}

/// Keeps the storable lines of a cart payload, in their original order.
///
/// ## Example
/// ```rust
/// use styler_core::cart::{filter_cart_items, CartItemDraft};
///
/// let drafts = vec![
///     CartItemDraft { product_id: Some(1), quantity: Some(2), ..Default::default() },
///     CartItemDraft { product_id: None, quantity: Some(1), ..Default::default() },
///     CartItemDraft { product_id: Some(3), quantity: Some(0), ..Default::default() },
/// ];
/// let items = filter_cart_items(drafts).unwrap();
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].product_id, 1);
/// ```
pub fn filter_cart_items(drafts: Vec<CartItemDraft>) -> ValidationResult<Vec<NewCartItem>> {
    let mut items = Vec::with_capacity(drafts.len());
    for draft in drafts {
        if let Some(item) = draft.into_item()? {
            items.push(item);
        }
    }
    Ok(items)
}

// =============================================================================
// Unit Tests
// =============================================================================
