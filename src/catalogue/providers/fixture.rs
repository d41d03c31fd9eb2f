//! In-memory catalogue provider.
//!
//! Serves listings and detail records from a map keyed by `(kind, parent_code)`.
//! Used by the tests, the `--provider fixture` mode of the binary, and anyone
//! who wants to browse a catalogue exported to JSON:
//!
//! ```json
//! {
//!   "listings": [
//!     { "kind": "country", "parent": "", "options": [{ "id": "NZ", "label": "New Zealand", "segment": "NZ" }] }
//!   ],
//!   "details": [{ "code": "NZ.014.~errors.E1", "title": "Inverted centre" }]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::catalogue::{CatalogueOption, CatalogueProvider, DetailRecord, ProviderError};
use crate::core::step::StepKind;

/// On-disk shape of a fixture file.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct CatalogueFixture {
    #[serde(default)]
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub details: Vec<DetailRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Listing {
    pub kind: StepKind,
    #[serde(default)]
    pub parent: String,
    pub options: Vec<CatalogueOption>,
}

#[derive(Debug, Default, Clone)]
pub struct FixtureCatalogueProvider {
    listings: HashMap<(StepKind, String), Vec<CatalogueOption>>,
    details: HashMap<String, DetailRecord>,
}

impl FixtureCatalogueProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: CatalogueFixture) -> Self {
        let mut provider = Self::new();
        for listing in fixture.listings {
            provider = provider.with_options(listing.kind, &listing.parent, listing.options);
        }
        for record in fixture.details {
            provider = provider.with_detail(record);
        }
        provider
    }

    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let fixture: CatalogueFixture =
            serde_json::from_str(json).map_err(|e| ProviderError::Parse(e.to_string()))?;
        Ok(Self::from_fixture(fixture))
    }

    /// Loads a fixture file from disk.
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ProviderError::Config(format!("{}: {e}", path.display())))?;
        let provider = Self::from_json(&json)?;
        info!(
            "Loaded fixture catalogue from {} ({} listings, {} details)",
            path.display(),
            provider.listings.len(),
            provider.details.len()
        );
        Ok(provider)
    }

    /// Registers the options of step `kind` beneath `parent`.
    /// Options for the same key are appended.
    pub fn with_options(
        mut self,
        kind: StepKind,
        parent: &str,
        options: Vec<CatalogueOption>,
    ) -> Self {
        self.listings
            .entry((kind, parent.to_string()))
            .or_default()
            .extend(options);
        self
    }

    pub fn with_detail(mut self, record: DetailRecord) -> Self {
        self.details.insert(record.code.clone(), record);
        self
    }

    /// A small slice of the New Zealand catalogue, deep enough to reach a stamp.
    pub fn sample() -> Self {
        use StepKind::*;
        let o = CatalogueOption::simple;
        let nz_1d = "NZ.014.1898.GBP.1d";
        let nz_stamp = "NZ.014.1898.GBP.1d.Carmine.Wove.NoWmk.14.Stamp";

        Self::new()
            .with_options(
                Country,
                "",
                vec![
                    o("NZ", "New Zealand"),
                    o("AU", "Australia"),
                    o("GB", "Great Britain"),
                ],
            )
            .with_options(
                Series,
                "NZ",
                vec![o("014", "1898 Pictorials"), o("015", "1907 Pictorials")],
            )
            .with_options(Year, "NZ.014", vec![o("1898", "1898"), o("1899", "1899")])
            .with_options(Currency, "NZ.014.1898", vec![o("GBP", "Sterling")])
            .with_options(Denomination, "NZ.014.1898.GBP", vec![o("1d", "1d"), o("2d", "2d")])
            .with_options(Color, nz_1d, vec![o("Carmine", "Carmine"), o("Lake", "Lake")])
            .with_options(Paper, &format!("{nz_1d}.Carmine"), vec![o("Wove", "Wove")])
            .with_options(
                Watermark,
                &format!("{nz_1d}.Carmine.Wove"),
                vec![
                    CatalogueOption::new("w0", "No watermark", None),
                    o("NZStar", "NZ and Star"),
                ],
            )
            .with_options(
                Perforation,
                &format!("{nz_1d}.Carmine.Wove.NoWmk"),
                vec![o("14", "Perf 14"), o("14.5", "Perf 14½")],
            )
            .with_options(
                ItemType,
                &format!("{nz_1d}.Carmine.Wove.NoWmk.14"),
                vec![o("Stamp", "Single stamp"), o("Block", "Block of four")],
            )
            .with_options(
                StampDetail,
                nz_stamp,
                vec![o("A1", "Pembroke Peak").with_metadata("sg", serde_json::json!("SG246"))],
            )
            .with_options(StampDetail, "NZ.014.~errors", vec![o("E1", "Inverted centre")])
            .with_detail(
                DetailRecord::new(format!("{nz_stamp}.A1"), "Pembroke Peak")
                    .with_attribute("sg", serde_json::json!("SG246"))
                    .with_attribute("issued", serde_json::json!("1898-04-05"))
                    .with_attribute("printer", serde_json::json!("Waterlow & Sons")),
            )
            .with_detail(
                DetailRecord::new("NZ.014.~errors.E1", "Inverted centre")
                    .with_attribute("known_copies", serde_json::json!(3)),
            )
    }
}

#[async_trait]
impl CatalogueProvider for FixtureCatalogueProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn fetch_options(
        &self,
        kind: StepKind,
        parent_code: &str,
    ) -> Result<Vec<CatalogueOption>, ProviderError> {
        let options = self
            .listings
            .get(&(kind, parent_code.to_string()))
            .cloned()
            .unwrap_or_default();
        debug!(
            "Fixture listing {} under '{}': {} options",
            kind,
            parent_code,
            options.len()
        );
        Ok(options)
    }

    async fn fetch_detail(&self, code: &str) -> Result<DetailRecord, ProviderError> {
        self.details
            .get(code)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::step::SideCategory;

    #[tokio::test]
    async fn test_unknown_listing_is_empty() {
        let provider = FixtureCatalogueProvider::new();
        let options = provider.fetch_options(StepKind::Year, "NZ.999").await.unwrap();
        assert!(options.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_detail_is_not_found() {
        let provider = FixtureCatalogueProvider::sample();
        let err = provider.fetch_detail("NZ.000").await.unwrap_err();
        assert_eq!(err, ProviderError::NotFound("NZ.000".to_string()));
    }

    #[tokio::test]
    async fn test_with_options_appends() {
        let provider = FixtureCatalogueProvider::new()
            .with_options(StepKind::Country, "", vec![CatalogueOption::simple("NZ", "New Zealand")])
            .with_options(StepKind::Country, "", vec![CatalogueOption::simple("AU", "Australia")]);
        let roots = provider.fetch_options(StepKind::Country, "").await.unwrap();
        assert_eq!(roots.len(), 2);
    }

    #[tokio::test]
    async fn test_from_json_fixture() {
        let json = r#"{
            "listings": [
                {"kind": "country", "options": [{"id": "NZ", "label": "New Zealand", "segment": "NZ"}]},
                {"kind": "errors", "parent": "NZ", "options": [{"id": "E9", "label": "Missing colour"}]}
            ],
            "details": [{"code": "NZ.E9", "title": "Missing colour"}]
        }"#;
        let provider = FixtureCatalogueProvider::from_json(json).unwrap();
        let roots = provider.fetch_options(StepKind::Country, "").await.unwrap();
        assert_eq!(roots[0].label, "New Zealand");
        let errors = provider
            .fetch_options(StepKind::SideCategory(SideCategory::Errors), "NZ")
            .await
            .unwrap();
        assert_eq!(errors[0].segment, None);
        assert_eq!(provider.fetch_detail("NZ.E9").await.unwrap().title, "Missing colour");
    }

    #[test]
    fn test_from_json_rejects_unknown_kind() {
        let json = r#"{"listings": [{"kind": "planet", "options": []}]}"#;
        let err = FixtureCatalogueProvider::from_json(json).unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = FixtureCatalogueProvider::load(Path::new("/nonexistent/catalogue.json"))
            .unwrap_err();
        assert!(matches!(err, ProviderError::Config(_)));
    }
}
