//! Response models for the pricing service API
//!
//! Defines the structure of the JSON bodies returned by each endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response body of the health probe (GET /)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub version: String,
}

/// Response body of GET /api/categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
    #[serde(default)]
    pub total: Option<usize>,
}

/// Product whose stock fell under the alert threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub product_id: u32,
    pub name: String,
    pub stock: u32,
}

/// Product ranked by its recent demand ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopDemandProduct {
    pub product_id: u32,
    pub name: String,
    pub demand_ratio: f64,
}

/// Aggregates for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatistics {
    pub product_count: u64,
    /// Mean base price across the category
    pub base_price: f64,
    /// Total units in stock
    pub stock: u64,
    /// Units sold over the last 7 days
    pub sales_7: u64,
}

/// Response body of GET /api/insights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub total_products: u64,
    pub total_stock: u64,
    pub total_sales_7days: u64,
    #[serde(default)]
    pub total_sales_30days: Option<u64>,
    pub average_price: f64,
    #[serde(default)]
    pub low_stock_alerts: Vec<LowStockAlert>,
    #[serde(default)]
    pub category_statistics: Option<BTreeMap<String, CategoryStatistics>>,
    #[serde(default)]
    pub top_demand_products: Option<Vec<TopDemandProduct>>,
}
