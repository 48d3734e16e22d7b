//! Remote Service Contract
//!
//! The requests the storefront makes against the pricing service.

use async_trait::async_trait;

use crate::catalog::{Product, ProductDetail};
use crate::client::{HealthStatus, Insights};
use crate::error::Result;

// == Remote Service Trait ==
/// Read-only access to the pricing service.
///
/// Implementations perform exactly one request per call; caching, retries and
/// failure presentation belong to the caller.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Connectivity probe against the service root.
    async fn health(&self) -> Result<HealthStatus>;

    /// Sorted list of category names.
    async fn categories(&self) -> Result<Vec<String>>;

    /// Full catalog with current dynamic prices.
    async fn products(&self) -> Result<Vec<Product>>;

    /// One product with the sales figures behind its price.
    async fn product(&self, product_id: u32) -> Result<ProductDetail>;

    /// Market insights summary.
    async fn insights(&self) -> Result<Insights>;
}
