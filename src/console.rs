//! Terminal Console
//!
//! Line-oriented presentation layer: parses commands from stdin, forwards them
//! to the session controller and re-renders whatever the session reports as
//! changed.

use std::str::FromStr;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

use storefront::catalog::SortKey;
use storefront::client::RemoteService;
use storefront::prefs::Theme;
use storefront::session::{
    ConnectionStatus, SearchDebouncer, SessionController, SessionEvent, StageOutcome,
    StartupReport,
};
use storefront::storage::FileStorage;

const HELP: &str = "\
commands:
  search <text>     filter by name or category (empty clears)
  category [name]   filter by category (no name shows all)
  sort <key>        name | dynamic_price | price_high | demand | stock
  next | prev       page through results
  add <id>          add one unit to the cart
  inc <id> | dec <id>
  remove <id>       drop a line item
  cart              show the cart
  clear             empty the cart
  detail <id>       product pricing detail
  insights          market insights
  reload            re-run the load sequence
  refresh           clear the response cache and reload
  theme             toggle light/dark
  help | quit";

// == Command ==
/// One parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Category(String),
    Sort(SortKey),
    Next,
    Previous,
    Add(u32),
    Increment(u32),
    Decrement(u32),
    Remove(u32),
    ShowCart,
    ClearCart,
    Detail(u32),
    ShowInsights,
    Reload,
    Refresh,
    ToggleTheme,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let id = || -> Result<u32, String> {
            rest.parse().map_err(|_| format!("'{}' expects a product id", verb))
        };

        match verb {
            "search" | "s" => Ok(Command::Search(rest.to_string())),
            "category" | "c" => Ok(Command::Category(rest.to_string())),
            "sort" => rest.parse().map(Command::Sort),
            "next" | "n" => Ok(Command::Next),
            "prev" | "p" => Ok(Command::Previous),
            "add" | "a" => id().map(Command::Add),
            "inc" => id().map(Command::Increment),
            "dec" => id().map(Command::Decrement),
            "remove" | "rm" => id().map(Command::Remove),
            "cart" => Ok(Command::ShowCart),
            "clear" => Ok(Command::ClearCart),
            "detail" | "d" => id().map(Command::Detail),
            "insights" | "i" => Ok(Command::ShowInsights),
            "reload" => Ok(Command::Reload),
            "refresh" => Ok(Command::Refresh),
            "theme" => Ok(Command::ToggleTheme),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{}', try 'help'", other)),
        }
    }
}

// == Console ==
pub struct Console {
    storage: FileStorage,
    theme: Theme,
}

impl Console {
    pub fn new(storage: FileStorage, theme: Theme) -> Self {
        Self { storage, theme }
    }

    // == Event Loop ==
    /// Runs until `quit`, end of input, or Ctrl+C.
    pub async fn run<S: RemoteService>(
        &mut self,
        session: &mut SessionController<S>,
        mut events: broadcast::Receiver<SessionEvent>,
        mut debouncer: SearchDebouncer,
        mut searches: mpsc::UnboundedReceiver<String>,
    ) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        info!("End of input");
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(Command::Quit) => break,
                        Ok(Command::Search(text)) => debouncer.schedule(text),
                        Ok(command) => self.execute(session, command).await,
                        Err(msg) => println!("{}", msg),
                    }
                }
                Some(text) = searches.recv() => session.on_search(&text),
                event = events.recv() => match event {
                    Ok(event) => self.render_event(session, &event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Renderer fell behind, redrawing");
                        self.render_all(session);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C, shutting down...");
                    break;
                }
            }
        }

        debouncer.cancel();
        Ok(())
    }

    async fn execute<S: RemoteService>(
        &mut self,
        session: &mut SessionController<S>,
        command: Command,
    ) {
        let result = match command {
            Command::Category(name) => {
                session.on_category_change(&name);
                Ok(())
            }
            Command::Sort(key) => {
                session.on_sort_change(key);
                Ok(())
            }
            Command::Next => {
                if !session.on_next_page() {
                    println!("(last page)");
                }
                Ok(())
            }
            Command::Previous => {
                if !session.on_previous_page() {
                    println!("(first page)");
                }
                Ok(())
            }
            Command::Add(id) => session.add_to_cart(id),
            Command::Increment(id) => session.update_cart_quantity(id, 1),
            Command::Decrement(id) => session.update_cart_quantity(id, -1),
            Command::Remove(id) => session.remove_from_cart(id),
            Command::ClearCart => session.clear_cart(),
            Command::ShowCart => {
                self.render_cart(session);
                Ok(())
            }
            Command::Detail(id) => session.product_detail(id).await.map(|detail| {
                println!(
                    "#{} {} [{}] base {:.2} now {:.2} ({:+.2}%) demand {} ratio {:.2}, \
                     sold {} (7d) / {} (30d), stock {}",
                    detail.product.product_id,
                    detail.product.name,
                    detail.product.category,
                    detail.product.base_price,
                    detail.product.dynamic_price,
                    detail.product.discount_percent,
                    detail.product.demand_level,
                    detail.demand_ratio,
                    detail.sales_7_days,
                    detail.sales_30_days,
                    detail.product.stock
                );
            }),
            Command::ShowInsights => {
                self.render_insights(session);
                Ok(())
            }
            Command::Reload => {
                let report = session.load().await;
                self.render_startup(&report);
                Ok(())
            }
            Command::Refresh => {
                session.invalidate_cache();
                let report = session.load().await;
                self.render_startup(&report);
                Ok(())
            }
            Command::ToggleTheme => {
                self.theme = self.theme.toggled();
                println!("theme: {}", self.theme);
                self.theme.save(&mut self.storage)
            }
            Command::Help => {
                println!("{}", HELP);
                Ok(())
            }
            // Handled by the event loop
            Command::Search(_) | Command::Quit => Ok(()),
        };

        if let Err(e) = result {
            println!("error: {}", e);
        }
    }

    // == Rendering ==
    fn render_event<S: RemoteService>(
        &self,
        session: &SessionController<S>,
        event: &SessionEvent,
    ) {
        match event {
            SessionEvent::StatusChanged(status) => self.render_status(*status),
            SessionEvent::CategoriesLoaded => self.render_categories(session),
            SessionEvent::ViewChanged => self.render_view(session),
            SessionEvent::InsightsLoaded => {}
            SessionEvent::SectionFailed { section, reason } => {
                println!("!! {} unavailable: {}", section, reason)
            }
            SessionEvent::CartChanged(summary) => {
                println!("cart: {} item(s), total {:.2}", summary.item_count, summary.total)
            }
        }
    }

    pub fn render_startup(&self, report: &StartupReport) {
        self.render_status(report.connectivity);
        for (name, outcome) in [
            ("categories", &report.categories),
            ("products", &report.products),
            ("insights", &report.insights),
        ] {
            match outcome {
                StageOutcome::Loaded { cached: true } => println!("{}: loaded (cached)", name),
                StageOutcome::Loaded { cached: false } => println!("{}: loaded", name),
                StageOutcome::Failed(reason) => println!("{}: unavailable ({})", name, reason),
            }
        }
    }

    pub fn render_all<S: RemoteService>(&self, session: &SessionController<S>) {
        self.render_categories(session);
        self.render_insights(session);
        self.render_view(session);
        self.render_cart(session);
    }

    fn render_status(&self, status: ConnectionStatus) {
        let label = match status {
            ConnectionStatus::Online => "online",
            ConnectionStatus::Offline => "offline",
            ConnectionStatus::Unknown => "unknown",
        };
        println!("[pricing service: {}]", label);
    }

    fn render_categories<S: RemoteService>(&self, session: &SessionController<S>) {
        if session.categories().is_empty() {
            return;
        }
        println!("categories: {}", session.categories().join(", "));
    }

    fn render_view<S: RemoteService>(&self, session: &SessionController<S>) {
        let query = session.query();
        let view = session.view();

        if view.is_empty {
            println!("No products match your filters.");
            return;
        }

        println!(
            "-- page {}/{} | sort {} | search '{}' | category {} --",
            query.current_page,
            view.total_pages,
            query.sort_key,
            query.search_query,
            query.selected_category.as_deref().unwrap_or("all")
        );
        for p in &view.page_items {
            println!(
                "{:>4}  {:<24} {:<12} {:>8.2} ({:+.1}%)  {:<6} stock {}",
                p.product_id,
                p.name,
                p.category,
                p.dynamic_price,
                p.discount_percent,
                p.demand_level,
                p.stock
            );
        }
    }

    fn render_cart<S: RemoteService>(&self, session: &SessionController<S>) {
        let cart = session.cart();
        if cart.is_empty() {
            println!("cart is empty");
            return;
        }
        for item in cart.items() {
            println!(
                "{:>4}  {:<24} {:>3} x {:>8.2} = {:>9.2}",
                item.product_id,
                item.name,
                item.quantity,
                item.unit_price,
                item.subtotal()
            );
        }
        println!("total: {:.2}", cart.total());
    }

    fn render_insights<S: RemoteService>(&self, session: &SessionController<S>) {
        let Some(insights) = session.insights() else {
            println!("insights unavailable");
            return;
        };
        println!(
            "insights: {} products, {} in stock, {} sold in 7 days, avg price {:.2}",
            insights.total_products,
            insights.total_stock,
            insights.total_sales_7days,
            insights.average_price
        );
        for alert in &insights.low_stock_alerts {
            println!(
                "  low stock: #{} {} ({} left)",
                alert.product_id, alert.name, alert.stock
            );
        }
        if let Some(top) = &insights.top_demand_products {
            for p in top.iter().take(5) {
                println!(
                    "  in demand: #{} {} (ratio {:.2})",
                    p.product_id, p.name, p.demand_ratio
                );
            }
        }
    }
}
