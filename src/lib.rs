//! Storefront - client core for a dynamically priced grocery catalog
//!
//! Provides TTL response caching, catalog search/filter/sort/paging, and a
//! persistent shopping cart on top of a remote pricing service.

pub mod cache;
pub mod cart;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod prefs;
pub mod session;
pub mod storage;

pub use config::Config;
pub use error::{Result, StorefrontError};
pub use session::SessionController;
