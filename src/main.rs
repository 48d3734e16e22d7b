//! Storefront - terminal client for a dynamically priced grocery catalog
//!
//! Loads the catalog from the pricing service and drives search, paging and
//! the persistent cart from stdin commands.

mod console;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront::cart::CartStore;
use storefront::client::HttpService;
use storefront::prefs::Theme;
use storefront::session::SearchDebouncer;
use storefront::storage::FileStorage;
use storefront::{Config, SessionController};

/// Main entry point for the storefront client.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open durable storage and restore the cart and theme
/// 4. Build the session controller over the HTTP pricing service
/// 5. Run the load sequence (probe, categories, products, insights)
/// 6. Hand control to the console until `quit` or Ctrl+C
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting storefront client");

    let config = Config::from_env();
    info!(
        "Configuration loaded: api_base_url={}, storage_dir={}, page_size={}, debounce={}ms",
        config.api_base_url,
        config.storage_dir.display(),
        config.page_size,
        config.search_debounce_ms
    );

    let storage = FileStorage::open(&config.storage_dir)
        .with_context(|| format!("opening storage at {}", config.storage_dir.display()))?;
    let theme = Theme::load(&storage);
    let cart = CartStore::load(storage.clone());
    info!(items = cart.items().len(), %theme, "Local state restored");

    let service = HttpService::new(&config.api_base_url).context("building pricing client")?;
    let mut session = SessionController::new(service, cart)
        .with_ttls(config.ttls())
        .with_page_size(config.page_size);
    let report = session.load().await;
    let events = session.subscribe();
    let (debouncer, searches) = SearchDebouncer::new(config.search_debounce());

    let mut console = console::Console::new(storage, theme);
    console.render_startup(&report);
    console.render_all(&session);
    console.run(&mut session, events, debouncer, searches).await?;

    info!("Storefront client shutdown complete");
    Ok(())
}
