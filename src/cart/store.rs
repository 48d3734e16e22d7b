//! Cart Store Module
//!
//! Ordered line-item collection persisted to a durable slot after every mutation.

use tracing::{debug, warn};

use crate::cart::{CartLineItem, CartSummary};
use crate::error::{Result, StorefrontError};
use crate::storage::{SlotStorage, CART_SLOT};

// == Cart Store ==
/// Shopping cart backed by a durable storage slot.
///
/// Items keep first-add order and there is at most one item per product id.
/// Every mutation writes the full item list before returning; totals are
/// always recomputed from the items.
pub struct CartStore {
    items: Vec<CartLineItem>,
    storage: Box<dyn SlotStorage>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    // == Constructor ==
    /// Loads the cart previously persisted in `storage`.
    ///
    /// A missing slot, a read failure or a malformed payload all yield an
    /// empty cart.
    pub fn load(storage: impl SlotStorage + 'static) -> Self {
        let items = match storage.read(CART_SLOT) {
            Ok(Some(payload)) => parse_items(&payload),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Cart slot unreadable, starting empty: {}", e);
                Vec::new()
            }
        };
        debug!(items = items.len(), "cart loaded");

        Self {
            items,
            storage: Box::new(storage),
        }
    }

    // == Add Item ==
    /// Adds one unit of a product.
    ///
    /// A product already in the cart gets its quantity bumped and keeps the
    /// price it was first added at. Quantities saturate at `u32::MAX`; adding
    /// to a saturated item returns false without writing.
    pub fn add_item(&mut self, product_id: u32, name: &str, unit_price: f64) -> Result<bool> {
        match self.position(product_id) {
            Some(idx) => {
                let item = &mut self.items[idx];
                let Some(quantity) = item.quantity.checked_add(1) else {
                    return Ok(false);
                };
                item.quantity = quantity;
            }
            None => self
                .items
                .push(CartLineItem::new(product_id, name, unit_price)),
        }
        self.persist()?;
        Ok(true)
    }

    // == Remove Item ==
    /// Removes the line item for `product_id`.
    ///
    /// Returns false, without writing, when the id is not in the cart.
    pub fn remove_item(&mut self, product_id: u32) -> Result<bool> {
        let Some(idx) = self.position(product_id) else {
            return Ok(false);
        };
        self.items.remove(idx);
        self.persist()?;
        Ok(true)
    }

    // == Update Quantity ==
    /// Adds `delta` to the item's quantity; a result of 0 or less removes it.
    ///
    /// Returns false, without writing, when the id is absent or the quantity
    /// ends up unchanged.
    pub fn update_quantity(&mut self, product_id: u32, delta: i64) -> Result<bool> {
        let Some(idx) = self.position(product_id) else {
            return Ok(false);
        };

        let current = self.items[idx].quantity;
        let quantity = i64::from(current).saturating_add(delta);
        if quantity <= 0 {
            self.items.remove(idx);
        } else {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            if quantity == current {
                return Ok(false);
            }
            self.items[idx].quantity = quantity;
        }
        self.persist()?;
        Ok(true)
    }

    // == Clear ==
    /// Empties the cart. Returns false, without writing, if it was empty.
    pub fn clear(&mut self) -> Result<bool> {
        if self.items.is_empty() {
            return Ok(false);
        }
        self.items.clear();
        self.persist()?;
        Ok(true)
    }

    // == Total ==
    /// Σ(unit_price × quantity), 0 for an empty cart.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    /// Number of units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary {
            item_count: self.item_count(),
            total: self.total(),
        }
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn get(&self, product_id: u32) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, product_id: u32) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id)
    }

    fn persist(&mut self) -> Result<()> {
        let payload = serde_json::to_string(&self.items)
            .map_err(|e| StorefrontError::Storage(format!("cannot encode cart: {}", e)))?;
        self.storage.write(CART_SLOT, &payload)
    }
}

/// Decodes a persisted item list, dropping anything that breaks the cart's
/// invariants.
fn parse_items(payload: &str) -> Vec<CartLineItem> {
    let decoded: Vec<CartLineItem> = match serde_json::from_str(payload) {
        Ok(items) => items,
        Err(e) => {
            warn!("Malformed cart payload, starting empty: {}", e);
            return Vec::new();
        }
    };

    let mut items: Vec<CartLineItem> = Vec::with_capacity(decoded.len());
    for item in decoded {
        if item.quantity == 0 || items.iter().any(|i| i.product_id == item.product_id) {
            warn!(product_id = item.product_id, "Dropping invalid cart line item");
            continue;
        }
        items.push(item);
    }
    items
}
