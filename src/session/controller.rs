//! Session Controller
//!
//! Owns the query state and the loaded storefront data, sequences startup
//! fetches through the TTL cache, and turns user actions into view and cart
//! updates.

use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, TtlCache};
use crate::cart::CartStore;
use crate::catalog::{
    compute_view, CatalogView, Product, ProductDetail, QueryState, SortKey, PAGE_SIZE,
};
use crate::client::{Insights, RemoteService};
use crate::error::{Result, StorefrontError};
use crate::session::{ConnectionStatus, Section, SessionEvent, StageOutcome, StartupReport};

// == Cache Keys ==
pub const CATEGORIES_KEY: &str = "categories";
pub const PRODUCTS_KEY: &str = "products";
pub const INSIGHTS_KEY: &str = "insights";

/// Cache key for a single product's detail.
pub fn product_key(product_id: u32) -> String {
    format!("product:{}", product_id)
}

const EVENT_CAPACITY: usize = 64;

// == Cached Response ==
/// Any response the controller memoizes.
#[derive(Debug, Clone)]
pub enum CachedResponse {
    Categories(Vec<String>),
    Products(Vec<Product>),
    Insights(Insights),
    ProductDetail(ProductDetail),
}

// == Resource TTLs ==
/// How long each kind of response stays fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTtls {
    pub categories: Duration,
    pub products: Duration,
    pub insights: Duration,
    pub product_detail: Duration,
}

impl Default for ResourceTtls {
    fn default() -> Self {
        Self {
            categories: Duration::from_secs(10 * 60),
            products: Duration::from_secs(5 * 60),
            insights: Duration::from_secs(2 * 60),
            product_detail: Duration::from_secs(5 * 60),
        }
    }
}

// == Session Controller ==
/// Single source of truth for what the storefront shows.
///
/// All methods take `&mut self`; the controller is owned by one task and
/// nothing inside it needs locking.
pub struct SessionController<S> {
    service: S,
    cache: TtlCache<CachedResponse>,
    ttls: ResourceTtls,
    page_size: usize,
    status: ConnectionStatus,
    categories: Vec<String>,
    catalog: Vec<Product>,
    insights: Option<Insights>,
    query: QueryState,
    view: CatalogView,
    cart: CartStore,
    events: broadcast::Sender<SessionEvent>,
}

impl<S: RemoteService> SessionController<S> {
    // == Constructor ==
    /// Creates a controller with default TTLs, page size and wall-clock cache.
    pub fn new(service: S, cart: CartStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let query = QueryState::default();
        // Nothing loaded yet: the view starts out empty
        let view = compute_view(&[], &query, PAGE_SIZE);
        Self {
            service,
            cache: TtlCache::new(),
            ttls: ResourceTtls::default(),
            page_size: PAGE_SIZE,
            status: ConnectionStatus::Unknown,
            categories: Vec::new(),
            catalog: Vec::new(),
            insights: None,
            query,
            view,
            cart,
            events,
        }
    }

    pub fn with_ttls(mut self, ttls: ResourceTtls) -> Self {
        self.ttls = ttls;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Replaces the response cache, e.g. with one driven by a manual clock.
    pub fn with_cache(mut self, cache: TtlCache<CachedResponse>) -> Self {
        self.cache = cache;
        self
    }

    /// Registers an observer. Events sent before subscribing are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // == Startup ==
    /// Runs the startup sequence: connectivity probe, categories, products,
    /// insights. A failing stage is reported and the next one still runs.
    pub async fn load(&mut self) -> StartupReport {
        info!("Loading storefront session");
        let connectivity = self.check_connectivity().await;
        let categories = self.load_categories().await;
        let products = self.load_products().await;
        let insights = self.load_insights().await;

        let report = StartupReport {
            connectivity,
            categories,
            products,
            insights,
        };
        if report.is_complete() {
            info!("Storefront session loaded");
        } else {
            warn!(?report, "Storefront session loaded with failures");
        }
        report
    }

    // == Connectivity Probe ==
    /// Probes the service root and updates the status indicator.
    pub async fn check_connectivity(&mut self) -> ConnectionStatus {
        let status = match self.service.health().await {
            Ok(health) => {
                info!(
                    status = %health.status,
                    version = %health.version,
                    "Pricing service reachable"
                );
                ConnectionStatus::Online
            }
            Err(e) => {
                warn!("Connectivity probe failed: {}", e);
                ConnectionStatus::Offline
            }
        };
        self.set_status(status);
        status
    }

    // == Load Categories ==
    pub async fn load_categories(&mut self) -> StageOutcome {
        if let Some(CachedResponse::Categories(categories)) = self.cache.get(CATEGORIES_KEY) {
            debug!("categories served from cache");
            self.categories = categories;
            self.emit(SessionEvent::CategoriesLoaded);
            return StageOutcome::Loaded { cached: true };
        }

        match self.service.categories().await {
            Ok(categories) => {
                self.mark_reachable();
                info!(count = categories.len(), "Categories fetched");
                self.cache.set(
                    CATEGORIES_KEY,
                    CachedResponse::Categories(categories.clone()),
                    self.ttls.categories,
                );
                self.categories = categories;
                self.emit(SessionEvent::CategoriesLoaded);
                StageOutcome::Loaded { cached: false }
            }
            Err(e) => self.stage_failed(Section::Categories, e),
        }
    }

    // == Load Products ==
    /// Loads the catalog and recomputes the view against the current query.
    pub async fn load_products(&mut self) -> StageOutcome {
        if let Some(CachedResponse::Products(products)) = self.cache.get(PRODUCTS_KEY) {
            debug!("products served from cache");
            self.catalog = products;
            self.refresh_view();
            return StageOutcome::Loaded { cached: true };
        }

        match self.service.products().await {
            Ok(products) => {
                self.mark_reachable();
                info!(count = products.len(), "Products fetched");
                self.cache.set(
                    PRODUCTS_KEY,
                    CachedResponse::Products(products.clone()),
                    self.ttls.products,
                );
                self.catalog = products;
                self.refresh_view();
                StageOutcome::Loaded { cached: false }
            }
            Err(e) => self.stage_failed(Section::Products, e),
        }
    }

    // == Load Insights ==
    pub async fn load_insights(&mut self) -> StageOutcome {
        if let Some(CachedResponse::Insights(insights)) = self.cache.get(INSIGHTS_KEY) {
            debug!("insights served from cache");
            self.insights = Some(insights);
            self.emit(SessionEvent::InsightsLoaded);
            return StageOutcome::Loaded { cached: true };
        }

        match self.service.insights().await {
            Ok(insights) => {
                self.mark_reachable();
                info!(low_stock = insights.low_stock_alerts.len(), "Insights fetched");
                self.cache.set(
                    INSIGHTS_KEY,
                    CachedResponse::Insights(insights.clone()),
                    self.ttls.insights,
                );
                self.insights = Some(insights);
                self.emit(SessionEvent::InsightsLoaded);
                StageOutcome::Loaded { cached: false }
            }
            Err(e) => self.stage_failed(Section::Insights, e),
        }
    }

    // == Product Detail ==
    /// Fetches one product's detail, memoized per product id.
    pub async fn product_detail(&mut self, product_id: u32) -> Result<ProductDetail> {
        let key = product_key(product_id);
        if let Some(CachedResponse::ProductDetail(detail)) = self.cache.get(&key) {
            return Ok(detail);
        }

        match self.service.product(product_id).await {
            Ok(detail) => {
                self.mark_reachable();
                self.cache.set(
                    key,
                    CachedResponse::ProductDetail(detail.clone()),
                    self.ttls.product_detail,
                );
                Ok(detail)
            }
            Err(e) => {
                if e.is_connectivity() {
                    self.set_status(ConnectionStatus::Offline);
                }
                warn!(product_id, "Product detail failed: {}", e);
                self.emit(SessionEvent::SectionFailed {
                    section: Section::ProductDetail,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Drops every cached response so the next load goes to the service.
    pub fn invalidate_cache(&mut self) {
        self.cache.clear();
        info!("Response cache cleared");
    }

    // == Query Actions ==
    /// Applies a (settled) search and returns to the first page.
    pub fn on_search(&mut self, text: &str) {
        self.query.search_query = text.trim().to_string();
        self.query.current_page = 1;
        self.refresh_view();
    }

    /// Selects a category; an empty name selects all categories.
    pub fn on_category_change(&mut self, category: &str) {
        let category = category.trim();
        self.query.selected_category = if category.is_empty() {
            None
        } else {
            Some(category.to_string())
        };
        self.query.current_page = 1;
        self.refresh_view();
    }

    pub fn on_sort_change(&mut self, sort_key: SortKey) {
        self.query.sort_key = sort_key;
        self.query.current_page = 1;
        self.refresh_view();
    }

    /// Moves one page forward. Returns false (and does nothing) on the last page.
    pub fn on_next_page(&mut self) -> bool {
        let last = self.view.total_pages.max(1);
        let target = self.query.current_page.saturating_add(1).min(last);
        self.go_to_page(target)
    }

    /// Moves one page back. Returns false (and does nothing) on the first page.
    pub fn on_previous_page(&mut self) -> bool {
        let last = self.view.total_pages.max(1);
        let target = self.query.current_page.saturating_sub(1).clamp(1, last);
        self.go_to_page(target)
    }

    fn go_to_page(&mut self, page: u32) -> bool {
        if page == self.query.current_page {
            return false;
        }
        self.query.current_page = page;
        self.refresh_view();
        true
    }

    fn refresh_view(&mut self) {
        self.view = compute_view(&self.catalog, &self.query, self.page_size);
        debug!(
            page = self.query.current_page,
            total_pages = self.view.total_pages,
            shown = self.view.page_items.len(),
            "view recomputed"
        );
        self.emit(SessionEvent::ViewChanged);
    }

    // == Cart Actions ==
    /// Adds one unit of a catalog product at its current dynamic price.
    pub fn add_to_cart(&mut self, product_id: u32) -> Result<()> {
        let product = self
            .catalog
            .iter()
            .find(|p| p.product_id == product_id)
            .ok_or(StorefrontError::UnknownProduct(product_id))?;
        let result = self
            .cart
            .add_item(product.product_id, &product.name, product.dynamic_price);
        self.cart_updated(result)
    }

    pub fn remove_from_cart(&mut self, product_id: u32) -> Result<()> {
        let result = self.cart.remove_item(product_id);
        self.cart_updated(result)
    }

    pub fn update_cart_quantity(&mut self, product_id: u32, delta: i64) -> Result<()> {
        let result = self.cart.update_quantity(product_id, delta);
        self.cart_updated(result)
    }

    pub fn clear_cart(&mut self) -> Result<()> {
        let result = self.cart.clear();
        self.cart_updated(result)
    }

    /// Notifies observers unless the mutation was a no-op. A failed write
    /// still leaves the in-memory cart changed, so it notifies too.
    fn cart_updated(&self, result: Result<bool>) -> Result<()> {
        if !matches!(result, Ok(false)) {
            self.emit(SessionEvent::CartChanged(self.cart.summary()));
        }
        result.map(|_| ())
    }

    // == Accessors ==
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    pub fn insights(&self) -> Option<&Insights> {
        self.insights.as_ref()
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    // == Internals ==
    fn stage_failed(&mut self, section: Section, err: StorefrontError) -> StageOutcome {
        if err.is_connectivity() {
            self.set_status(ConnectionStatus::Offline);
        }
        warn!(%section, "Failed to load: {}", err);
        let reason = err.to_string();
        self.emit(SessionEvent::SectionFailed {
            section,
            reason: reason.clone(),
        });
        StageOutcome::Failed(reason)
    }

    fn mark_reachable(&mut self) {
        if self.status != ConnectionStatus::Online {
            self.set_status(ConnectionStatus::Online);
        }
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
        self.emit(SessionEvent::StatusChanged(status));
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine: nothing is rendering yet
        let _ = self.events.send(event);
    }
}
