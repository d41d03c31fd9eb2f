//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::catalogue::{
    CatalogueOption, CatalogueProvider, DetailRecord, FixtureCatalogueProvider, ProviderError,
};
use crate::core::controller::StackController;
use crate::core::step::StepKind;

/// A provider whose every call fails with a network error.
pub struct FailingProvider;

#[async_trait]
impl CatalogueProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch_options(
        &self,
        _kind: StepKind,
        _parent_code: &str,
    ) -> Result<Vec<CatalogueOption>, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }

    async fn fetch_detail(&self, _code: &str) -> Result<DetailRecord, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }
}

pub fn option(segment: &str, label: &str) -> CatalogueOption {
    CatalogueOption::simple(segment, label)
}

/// The sample New Zealand catalogue.
pub fn nz_provider() -> FixtureCatalogueProvider {
    FixtureCatalogueProvider::sample()
}

/// Creates an empty controller browsing the sample catalogue.
pub fn nz_controller() -> StackController {
    StackController::new(Arc::new(nz_provider()))
}
