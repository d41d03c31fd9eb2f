use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A selectable item returned by a provider for one step.
///
/// `metadata` carries whatever the provider attaches (counts, image URLs,
/// prices). The navigation engine passes it through untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogueOption {
    pub id: String,
    pub label: String,
    /// Token this option contributes to the composite code. May be missing
    /// or `null` in provider data; the code builder substitutes a placeholder.
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl CatalogueOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, segment: Option<&str>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            segment: segment.map(str::to_string),
            metadata: Map::new(),
        }
    }

    /// Shorthand for an option whose id and segment are the same token.
    pub fn simple(segment: &str, label: impl Into<String>) -> Self {
        Self::new(segment, label, Some(segment))
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

/// Full record for a single stamp, fetched when a stamp is selected.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DetailRecord {
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl DetailRecord {
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: Value) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_option_accepts_null_segment() {
        let option: CatalogueOption =
            serde_json::from_str(r#"{"id": "w0", "label": "No watermark", "segment": null}"#)
                .unwrap();
        assert_eq!(option.segment, None);
        assert!(option.metadata.is_empty());
    }

    #[test]
    fn test_option_keeps_provider_metadata() {
        let json = r#"{
            "id": "014",
            "label": "1898 Pictorials",
            "segment": "014",
            "metadata": {"count": 13, "image": "https://img/014.png"}
        }"#;
        let option: CatalogueOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.metadata.get("count"), Some(&json!(13)));
        assert_eq!(option.segment.as_deref(), Some("014"));
    }

    #[test]
    fn test_with_metadata_builder() {
        let option = CatalogueOption::simple("NZ", "New Zealand").with_metadata("stamps", json!(4210));
        assert_eq!(option.id, "NZ");
        assert_eq!(option.metadata["stamps"], json!(4210));
    }

    #[test]
    fn test_detail_record_attributes_default_empty() {
        let record: DetailRecord =
            serde_json::from_str(r#"{"code": "NZ.014", "title": "Pembroke Peak"}"#).unwrap();
        assert!(record.attributes.is_empty());
    }
}
