//! HTTP Remote Service
//!
//! `RemoteService` implementation over `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::{Product, ProductDetail};
use crate::client::{CategoriesResponse, HealthStatus, Insights, RemoteService};
use crate::error::{Result, StorefrontError};

// Relative to the base URL so a path prefix on the base is kept
pub const HEALTH_PATH: &str = "";
pub const CATEGORIES_PATH: &str = "api/categories";
pub const PRODUCTS_PATH: &str = "api/products";
pub const INSIGHTS_PATH: &str = "api/insights";

// == HTTP Service ==
/// Pricing service reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpService {
    client: Client,
    base: Url,
}

impl HttpService {
    /// Creates a client for the service mounted at `base_url`.
    ///
    /// Any path on the base is kept as a prefix for every endpoint.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|e| {
            StorefrontError::Config(format!("invalid API base URL '{}': {}", base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(StorefrontError::Config(format!(
                "API base URL '{}' cannot carry paths",
                base_url
            )));
        }
        base.set_query(None);
        base.set_fragment(None);
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(|e| StorefrontError::Config(e.to_string()))?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("storefront/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| StorefrontError::Config(format!("invalid path '{}': {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        // Errors name the full request path, prefix included
        let path = url.path().to_string();
        debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(&path, e))?;
        Self::handle(&path, resp).await
    }

    async fn handle<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            return Err(StorefrontError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = resp.bytes().await.map_err(|e| transport_error(path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| StorefrontError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

fn transport_error(path: &str, err: reqwest::Error) -> StorefrontError {
    if err.is_decode() {
        StorefrontError::Decode {
            path: path.to_string(),
            reason: err.to_string(),
        }
    } else {
        StorefrontError::Connectivity(format!("{}: {}", path, err))
    }
}

#[async_trait]
impl RemoteService for HttpService {
    async fn health(&self) -> Result<HealthStatus> {
        self.get_json(HEALTH_PATH).await
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let resp: CategoriesResponse = self.get_json(CATEGORIES_PATH).await?;
        Ok(resp.categories)
    }

    async fn products(&self) -> Result<Vec<Product>> {
        self.get_json(PRODUCTS_PATH).await
    }

    async fn product(&self, product_id: u32) -> Result<ProductDetail> {
        self.get_json(&format!("{}/{}", PRODUCTS_PATH, product_id)).await
    }

    async fn insights(&self) -> Result<Insights> {
        self.get_json(INSIGHTS_PATH).await
    }
}
