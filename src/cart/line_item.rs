//! Cart Line Item Module

use serde::{Deserialize, Serialize};

// == Line Item ==
/// One distinct product in the cart and how many of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: u32,
    pub name: String,
    /// Price captured when the product was first added
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartLineItem {
    /// Creates a line item with quantity 1.
    pub fn new(product_id: u32, name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity: 1,
        }
    }

    /// unit_price × quantity
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

// == Cart Summary ==
/// Observer-facing aggregates of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartSummary {
    pub item_count: u64,
    pub total: f64,
}
