//! # Catalogue Data
//!
//! Option and detail types, the `CatalogueProvider` capability the navigator
//! fetches from, and the two providers that ship with the crate.

pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{CatalogueProvider, ProviderError};
pub use providers::{FixtureCatalogueProvider, HttpCatalogueProvider, build_provider};
pub use types::{CatalogueOption, DetailRecord};
