//! Pricing Service Client
//!
//! Typed contract for the remote pricing service and its HTTP implementation.
//!
//! # Endpoints
//! - `GET /` - Health probe
//! - `GET /api/categories` - Category names
//! - `GET /api/products` - Full catalog
//! - `GET /api/products/{id}` - Product detail
//! - `GET /api/insights` - Market insights

mod http;
mod models;
mod service;

pub use http::HttpService;
pub use models::{
    CategoriesResponse, CategoryStatistics, HealthStatus, Insights, LowStockAlert,
    TopDemandProduct,
};
pub use service::RemoteService;
