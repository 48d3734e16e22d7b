//! Cart Module
//!
//! Persistent shopping cart with price-at-add-time line items.

mod line_item;
mod store;


pub use line_item::{CartLineItem, CartSummary};
pub use store::CartStore;
