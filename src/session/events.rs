//! Session Events
//!
//! Notifications the controller emits for the presentation layer, and the
//! per-stage outcome of a startup sequence.

use std::fmt;

use serde::Serialize;

use crate::cart::CartSummary;

// == Connection Status ==
/// Reachability of the pricing service as last observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

// == Section ==
/// Independently loaded part of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Categories,
    Products,
    Insights,
    ProductDetail,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Categories => "categories",
            Section::Products => "products",
            Section::Insights => "insights",
            Section::ProductDetail => "product detail",
        };
        f.write_str(name)
    }
}

// == Session Event ==
/// Change notification. Observers read the new state from the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StatusChanged(ConnectionStatus),
    CategoriesLoaded,
    /// The visible catalog page must be re-rendered
    ViewChanged,
    InsightsLoaded,
    SectionFailed { section: Section, reason: String },
    CartChanged(CartSummary),
}

// == Stage Outcome ==
/// Result of one startup stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Data is in place; `cached` is true when no request was made
    Loaded { cached: bool },
    Failed(String),
}

impl StageOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, StageOutcome::Loaded { .. })
    }
}

// == Startup Report ==
/// What each stage of `SessionController::load` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    pub connectivity: ConnectionStatus,
    pub categories: StageOutcome,
    pub products: StageOutcome,
    pub insights: StageOutcome,
}

impl StartupReport {
    /// True when every section loaded.
    pub fn is_complete(&self) -> bool {
        self.categories.is_loaded() && self.products.is_loaded() && self.insights.is_loaded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_complete() {
        let mut report = StartupReport {
            connectivity: ConnectionStatus::Online,
            categories: StageOutcome::Loaded { cached: false },
            products: StageOutcome::Loaded { cached: true },
            insights: StageOutcome::Loaded { cached: false },
        };
        assert!(report.is_complete());

        report.insights = StageOutcome::Failed("status 500".to_string());
        assert!(!report.is_complete());
    }

    #[test]
    fn test_section_display() {
        assert_eq!(Section::ProductDetail.to_string(), "product detail");
    }
}
