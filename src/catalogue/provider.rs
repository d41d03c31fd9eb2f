use std::fmt;

use async_trait::async_trait;

use super::types::{CatalogueOption, DetailRecord};
use crate::core::step::StepKind;

/// Errors that can occur during provider operations.
/// The navigation engine treats every variant the same way: nothing is pushed.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider misconfigured (missing base URL, unreadable fixture).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    Parse(String),
    /// Nothing is catalogued under the requested code.
    NotFound(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::NotFound(code) => write!(f, "not found: {code}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Source of catalogue data for the navigator.
///
/// `fetch_options(kind, parent_code)` returns the options of step `kind`
/// beneath `parent_code`. The root catalogue is `fetch_options(Country, "")`.
#[async_trait]
pub trait CatalogueProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    async fn fetch_options(
        &self,
        kind: StepKind,
        parent_code: &str,
    ) -> Result<Vec<CatalogueOption>, ProviderError>;

    async fn fetch_detail(&self, code: &str) -> Result<DetailRecord, ProviderError>;
}
