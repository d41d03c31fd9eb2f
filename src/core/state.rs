//! # Browser State
//!
//! Everything a front-end needs to show the catalogue browser. No
//! presentation types live here; the TUI keeps its own cursor and list state.
//!
//! ```text
//! Browser
//! ├── controller: StackController   // navigation stack + provider
//! ├── roots: Vec<CatalogueOption>   // top-level catalogue (countries)
//! ├── status_message: String        // status bar text
//! ├── is_loading: bool              // waiting for the provider
//! └── error: Option<String>         // last failure, cleared on success
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::catalogue::{CatalogueOption, CatalogueProvider};
use crate::core::controller::StackController;
use crate::core::stack::StackEntry;

pub struct Browser {
    pub controller: StackController,
    pub roots: Vec<CatalogueOption>,
    pub status_message: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Browser {
    pub fn new(provider: Arc<dyn CatalogueProvider>) -> Self {
        Self {
            controller: StackController::new(provider),
            roots: Vec::new(),
            status_message: String::from("Choose a country"),
            is_loading: false,
            error: None,
        }
    }

    /// The options currently on screen: the top frame's, or the roots.
    pub fn visible_options(&self) -> &[CatalogueOption] {
        match self.controller.top() {
            Some(top) => &top.options,
            None => &self.roots,
        }
    }

    pub fn current_stack(&self) -> &[StackEntry] {
        self.controller.current_stack()
    }

    /// Breadcrumb text for the title bar.
    pub fn breadcrumb(&self) -> String {
        let titles = self.controller.breadcrumb();
        if titles.is_empty() {
            "Catalogue".to_string()
        } else {
            titles.join(" › ")
        }
    }

    /// Composite code of the open path, empty at the root catalogue.
    pub fn current_code(&self) -> &str {
        self.controller.top().map(|t| t.code.as_str()).unwrap_or_default()
    }
}
