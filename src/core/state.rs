//! # Application State
//!
//! Core business state for RentDesk. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── provider: Arc<dyn CompletionProvider>  // text generation
//! ├── model_name: String                     // model sent with each request
//! ├── business_name: String                  // named in every prompt
//! ├── inventory: Vec<InventoryItem>          // insertion order
//! ├── rentals: Vec<RentalTransaction>        // newest first
//! ├── active_tab: Tab                        // exactly one view at a time
//! ├── status_message: String                 // status bar text
//! ├── analysis: Option<String>               // last financial summary
//! ├── is_analyzing: bool                     // summary request in flight
//! └── drafting: HashSet<RentalId>            // agreement drafts in flight
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::collections::HashSet;
use std::sync::Arc;

use crate::core::config::{DEFAULT_BUSINESS_NAME, ResolvedConfig};
use crate::core::model::{InventoryItem, RentalId, RentalTransaction};
use crate::core::{rental, sample};
use crate::inference::CompletionProvider;

/// The four top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Inventory,
    Rentals,
    Reports,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Inventory, Tab::Rentals, Tab::Reports];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Inventory => "Inventory",
            Tab::Rentals => "Rentals",
            Tab::Reports => "Reports",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

pub struct App {
    pub provider: Arc<dyn CompletionProvider>,
    pub model_name: String,
    pub business_name: String,
    pub inventory: Vec<InventoryItem>,
    pub rentals: Vec<RentalTransaction>,
    pub active_tab: Tab,
    pub status_message: String,
    pub analysis: Option<String>,
    pub is_analyzing: bool,
    /// Rentals whose agreement has been requested but not yet stored.
    pub drafting: HashSet<RentalId>,
}

impl App {
    /// An empty shop: no items, no rentals.
    pub fn new(provider: Arc<dyn CompletionProvider>, model_name: String) -> Self {
        Self {
            provider,
            model_name,
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            inventory: Vec::new(),
            rentals: Vec::new(),
            active_tab: Tab::default(),
            status_message: String::from("Welcome to RentDesk!"),
            analysis: None,
            is_analyzing: false,
            drafting: HashSet::new(),
        }
    }

    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(provider, config.model_name.clone());
        app.business_name = config.business_name.clone();
        if config.seed_sample_data {
            app = app.with_sample_data();
        }
        app
    }

    /// Replaces both collections with the demo shop.
    pub fn with_sample_data(mut self) -> Self {
        self.inventory = sample::inventory();
        self.rentals = sample::rentals();
        self
    }

    /// True while any agreement draft is outstanding.
    pub fn is_drafting(&self) -> bool {
        !self.drafting.is_empty()
    }

    /// True while any background generation is running.
    pub fn is_busy(&self) -> bool {
        self.is_drafting() || self.is_analyzing
    }

    pub fn available_items(&self) -> Vec<&InventoryItem> {
        rental::available_items(&self.inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Provider;
    use crate::test_support::test_app;
    use std::time::Duration;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Welcome to RentDesk!");
        assert_eq!(app.model_name, "test-model");
        assert_eq!(app.business_name, "Soleh Rent");
        assert_eq!(app.active_tab, Tab::Dashboard);
        assert!(app.inventory.is_empty());
        assert!(!app.is_drafting());
        assert!(!app.is_analyzing);
        assert!(!app.is_busy());
    }

    #[test]
    fn test_busy_while_drafting_or_analyzing() {
        let mut app = test_app();
        app.drafting.insert(RentalId::from("r1"));
        assert!(app.is_busy());
        app.drafting.clear();
        app.is_analyzing = true;
        assert!(app.is_busy());
    }

    #[test]
    fn test_tab_cycle_wraps() {
        assert_eq!(Tab::Dashboard.next(), Tab::Inventory);
        assert_eq!(Tab::Reports.next(), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.prev(), Tab::Reports);
        assert_eq!(Tab::Rentals.index(), 2);
    }

    #[test]
    fn test_from_config_honours_seed_flag() {
        let mut config = ResolvedConfig {
            business_name: "Toko HP".to_string(),
            provider: Provider::Gemini,
            model_name: "gemini-2.5-flash".to_string(),
            request_timeout: Duration::from_secs(60),
            seed_sample_data: true,
            gemini_api_key: None,
            gemini_base_url: String::new(),
            openrouter_api_key: None,
            openrouter_base_url: String::new(),
        };
        let seeded = App::from_config(test_app().provider, &config);
        assert_eq!(seeded.inventory.len(), 4);
        assert_eq!(seeded.rentals.len(), 1);
        assert_eq!(seeded.business_name, "Toko HP");
        assert_eq!(seeded.available_items().len(), 2);

        config.seed_sample_data = false;
        let empty = App::from_config(test_app().provider, &config);
        assert!(empty.inventory.is_empty());
        assert!(empty.rentals.is_empty());
    }
}
