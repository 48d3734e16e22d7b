//! Session Module
//!
//! Startup sequencing, query-state ownership, change notifications and
//! search debouncing for one storefront session.

mod controller;
mod debounce;
mod events;

pub use controller::{
    product_key, CachedResponse, ResourceTtls, SessionController, CATEGORIES_KEY, INSIGHTS_KEY,
    PRODUCTS_KEY,
};
pub use debounce::{SearchDebouncer, SEARCH_DEBOUNCE};
pub use events::{ConnectionStatus, Section, SessionEvent, StageOutcome, StartupReport};
