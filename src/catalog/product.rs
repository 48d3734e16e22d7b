//! Product Module
//!
//! Catalog records as supplied by the pricing service.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Demand Level ==
/// Coarse sales-momentum classification assigned by the pricing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DemandLevel {
    Low,
    Medium,
    High,
}

impl DemandLevel {
    /// Ordering weight used when sorting by demand: High=3, Medium=2, Low=1.
    pub fn rank(self) -> u8 {
        match self {
            DemandLevel::Low => 1,
            DemandLevel::Medium => 2,
            DemandLevel::High => 3,
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DemandLevel::Low => "Low",
            DemandLevel::Medium => "Medium",
            DemandLevel::High => "High",
        };
        f.pad(label)
    }
}

// == Product ==
/// Immutable product snapshot with its current dynamic price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: u32,
    pub name: String,
    pub category: String,
    pub base_price: f64,
    pub dynamic_price: f64,
    /// Markup (positive) or discount (negative) relative to base price, in percent
    pub discount_percent: f64,
    pub demand_level: DemandLevel,
    pub stock: u32,
}

// == Product Detail ==
/// Single-product view with the sales figures behind its pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub demand_ratio: f64,
    pub sales_7_days: u64,
    pub sales_30_days: u64,
}
