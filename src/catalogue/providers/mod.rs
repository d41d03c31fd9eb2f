pub mod fixture;
pub mod http;

use std::sync::Arc;
use std::time::Duration;

use log::info;

pub use fixture::{CatalogueFixture, FixtureCatalogueProvider};
pub use http::HttpCatalogueProvider;

use crate::catalogue::{CatalogueProvider, ProviderError};
use crate::core::config::ResolvedConfig;

/// Build a provider from a resolved config's provider name and settings.
pub fn build_provider(config: &ResolvedConfig) -> Result<Arc<dyn CatalogueProvider>, ProviderError> {
    let provider: Arc<dyn CatalogueProvider> = match config.provider.as_str() {
        "http" => Arc::new(HttpCatalogueProvider::new(
            config.api_base_url.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.timeout_secs),
        )?),
        "fixture" => match &config.fixture_path {
            Some(path) => Arc::new(FixtureCatalogueProvider::load(path)?),
            None => Arc::new(FixtureCatalogueProvider::sample()),
        },
        other => {
            return Err(ProviderError::Config(format!(
                "unknown provider '{other}' (expected 'http' or 'fixture')"
            )));
        }
    };
    info!("Using catalogue provider: {}", provider.name());
    Ok(provider)
}
