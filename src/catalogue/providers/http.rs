//! REST catalogue provider.
//!
//! Endpoints (relative to the configured base URL):
//!
//! - `GET /categories/{kind}?parent={code}` → JSON array of options
//! - `GET /stamps/{code}` → JSON detail record
//!
//! `kind` is the step slug (`series`, `item-type`, `postal-history`, ...).
//! Each code is sent as one percent-encoded path segment, so a `/`, `?` or
//! `#` inside a segment (a `1/2d` denomination) stays part of the code.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::catalogue::{CatalogueOption, CatalogueProvider, DetailRecord, ProviderError};
use crate::core::step::StepKind;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Catalogue API provider backed by `reqwest`.
pub struct HttpCatalogueProvider {
    base_url: Url,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl HttpCatalogueProvider {
    /// Creates a new HTTP provider.
    ///
    /// # Arguments
    /// * `base_url` - Root of the catalogue API, without a trailing slash
    /// * `api_token` - Optional bearer token
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: String,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if base_url.trim().is_empty() {
            return Err(ProviderError::Config("catalogue base URL is empty".to_string()));
        }
        let base_url = Url::parse(base_url.trim().trim_end_matches('/'))
            .map_err(|e| ProviderError::Config(format!("invalid catalogue base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::Config(format!(
                "catalogue base URL can not carry a path: {base_url}"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;
        Ok(Self {
            base_url,
            api_token,
            client,
        })
    }

    /// The base URL extended by `segments`, each encoded as a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProviderError::Config(format!("invalid catalogue base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = self.endpoint(segments)?;
        info!("Catalogue request: GET {} {:?}", url, query);

        let mut request = self.client.get(url.clone()).query(query);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Catalogue response status: {}", status);

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Catalogue API error: {} - {}", status.as_u16(), body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogueProvider for HttpCatalogueProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_options(
        &self,
        kind: StepKind,
        parent_code: &str,
    ) -> Result<Vec<CatalogueOption>, ProviderError> {
        self.get_json(&["categories", kind.slug()], &[("parent", parent_code)])
            .await
    }

    async fn fetch_detail(&self, code: &str) -> Result<DetailRecord, ProviderError> {
        self.get_json(&["stamps", code], &[]).await
    }
}
