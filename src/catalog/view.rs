//! Catalog View Module
//!
//! Derives the visible product page from the full catalog and the query state.

use std::cmp::Ordering;

use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::catalog::{Product, QueryState, SortKey};

// == Catalog View ==
/// One page of the filtered and sorted catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogView {
    pub page_items: Vec<Product>,
    /// Zero when nothing matches
    pub total_pages: u32,
    pub is_empty: bool,
}

// == Compute View ==
/// Filters, sorts and paginates `catalog` according to `query`.
///
/// Steps run in a fixed order: search filter, category filter, stable sort,
/// emptiness check, then pagination. `current_page` is not clamped; a page
/// outside `[1, total_pages]` yields no items. A `page_size` of 0 is treated
/// as 1.
pub fn compute_view(catalog: &[Product], query: &QueryState, page_size: usize) -> CatalogView {
    let mut matches = filter(catalog, query);

    if matches.is_empty() {
        return CatalogView {
            page_items: Vec::new(),
            total_pages: 0,
            is_empty: true,
        };
    }

    sort(&mut matches, query.sort_key);

    let page_size = page_size.max(1);
    let total_pages = u32::try_from(matches.len().div_ceil(page_size)).unwrap_or(u32::MAX);
    let page_items = page_slice(&matches, query.current_page, page_size)
        .iter()
        .map(|product| (*product).clone())
        .collect();

    CatalogView {
        page_items,
        total_pages,
        is_empty: false,
    }
}

// == Filter ==
/// Applies the search filter, then the category filter.
pub fn filter<'a>(catalog: &'a [Product], query: &QueryState) -> Vec<&'a Product> {
    let needle = query.search_query.trim().to_lowercase();

    catalog
        .iter()
        .filter(|product| {
            needle.is_empty()
                || product.name.to_lowercase().contains(&needle)
                || product.category.to_lowercase().contains(&needle)
        })
        .filter(|product| match &query.selected_category {
            Some(category) if !category.is_empty() => &product.category == category,
            _ => true,
        })
        .collect()
}

// == Sort ==
/// Stable sort by `key`; equal elements keep their catalog order.
pub fn sort(products: &mut [&Product], key: SortKey) {
    match key {
        SortKey::Name => products.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
        SortKey::DynamicPrice => {
            products.sort_by(|a, b| a.dynamic_price.total_cmp(&b.dynamic_price))
        }
        SortKey::PriceHigh => {
            products.sort_by(|a, b| b.dynamic_price.total_cmp(&a.dynamic_price))
        }
        SortKey::Demand => {
            products.sort_by(|a, b| b.demand_level.rank().cmp(&a.demand_level.rank()))
        }
        SortKey::Stock => products.sort_by(|a, b| b.stock.cmp(&a.stock)),
    }
}

/// Dictionary-style comparison: letters compare without accents or case
/// first, then with accents, and the exact spelling only breaks ties.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    let base = |s: &str| {
        s.nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect::<Vec<char>>()
    };
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<char>>();

    base(a)
        .cmp(&base(b))
        .then_with(|| folded(a).cmp(&folded(b)))
        .then_with(|| a.cmp(b))
}

fn page_slice<'a, T>(items: &'a [T], current_page: u32, page_size: usize) -> &'a [T] {
    let Some(page_index) = current_page.checked_sub(1) else {
        return &[];
    };
    let start = (page_index as usize).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
