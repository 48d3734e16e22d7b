//! Query State Module
//!
//! The shopper's current search, filter, sort and page selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// == Sort Key ==
/// Ordering applied to the filtered catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Name, ascending
    #[default]
    Name,
    /// Dynamic price, ascending
    DynamicPrice,
    /// Dynamic price, descending
    PriceHigh,
    /// Demand level, highest first
    Demand,
    /// Stock, largest first
    Stock,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Name,
        SortKey::DynamicPrice,
        SortKey::PriceHigh,
        SortKey::Demand,
        SortKey::Stock,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::DynamicPrice => "dynamic_price",
            SortKey::PriceHigh => "price_high",
            SortKey::Demand => "demand",
            SortKey::Stock => "stock",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown sort key '{}'", s))
    }
}

// == Query State ==
/// Search, filter, sort and page selection driving the catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub search_query: String,
    /// `None` shows every category
    pub selected_category: Option<String>,
    pub sort_key: SortKey,
    /// 1-based page number
    pub current_page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            selected_category: None,
            sort_key: SortKey::default(),
            current_page: 1,
        }
    }
}
