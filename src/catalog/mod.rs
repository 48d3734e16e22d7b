//! Catalog Module
//!
//! Product records, query state, and the pure view derivation over them.

mod product;
mod query;
mod view;


pub use product::{DemandLevel, Product, ProductDetail};
pub use query::{QueryState, SortKey};
pub use view::{compute_view, filter, sort, CatalogView};

// == Public Constants ==
/// Products shown per catalog page
pub const PAGE_SIZE: usize = 12;
