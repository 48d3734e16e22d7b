//! Configuration Module
//!
//! Handles loading and managing client configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::PAGE_SIZE;
use crate::session::ResourceTtls;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote pricing service
    pub api_base_url: String,
    /// Directory holding the durable storage slots
    pub storage_dir: PathBuf,
    /// Number of products per catalog page
    pub page_size: usize,
    /// Quiet period before a search keystroke is applied, in milliseconds
    pub search_debounce_ms: u64,
    /// Category list TTL in seconds
    pub categories_ttl: u64,
    /// Product catalog TTL in seconds
    pub products_ttl: u64,
    /// Insights TTL in seconds
    pub insights_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Pricing service base URL (default: http://127.0.0.1:8000)
    /// - `STORAGE_DIR` - Durable slot directory (default: .storefront)
    /// - `PAGE_SIZE` - Products per page (default: 12)
    /// - `SEARCH_DEBOUNCE_MS` - Search quiet period (default: 300)
    /// - `CATEGORIES_TTL` - Category cache TTL in seconds (default: 600)
    /// - `PRODUCTS_TTL` - Product cache TTL in seconds (default: 300)
    /// - `INSIGHTS_TTL` - Insights cache TTL in seconds (default: 120)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            page_size: parse_var("PAGE_SIZE").unwrap_or(defaults.page_size),
            search_debounce_ms: parse_var("SEARCH_DEBOUNCE_MS")
                .unwrap_or(defaults.search_debounce_ms),
            categories_ttl: parse_var("CATEGORIES_TTL").unwrap_or(defaults.categories_ttl),
            products_ttl: parse_var("PRODUCTS_TTL").unwrap_or(defaults.products_ttl),
            insights_ttl: parse_var("INSIGHTS_TTL").unwrap_or(defaults.insights_ttl),
        }
    }

    /// Per-resource cache TTLs derived from this configuration.
    pub fn ttls(&self) -> ResourceTtls {
        ResourceTtls {
            categories: Duration::from_secs(self.categories_ttl),
            products: Duration::from_secs(self.products_ttl),
            insights: Duration::from_secs(self.insights_ttl),
            product_detail: Duration::from_secs(self.products_ttl),
        }
    }

    /// Debounce quiet period as a Duration.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            storage_dir: PathBuf::from(".storefront"),
            page_size: PAGE_SIZE,
            search_debounce_ms: 300,
            categories_ttl: 600,
            products_ttl: 300,
            insights_ttl: 120,
        }
    }
}
