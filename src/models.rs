//! Data structures for the manifest and registry descriptor files.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How a manifest entry was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    UrlSuccess,
    DirectName,
    UrlFetchFailed,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::UrlSuccess => "url_success",
            SourceType::DirectName => "direct_name",
            SourceType::UrlFetchFailed => "url_fetch_failed",
        }
    }
}

/// One row of `21st-registry.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub source_type: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_item: Option<RegistryItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl ManifestEntry {
    /// Graph key: the source URL when known, otherwise the name.
    pub fn node_id(&self) -> &str {
        self.source_url.as_deref().unwrap_or(&self.name)
    }

    /// Duplicate identity.
    pub fn same_identity(&self, other: &ManifestEntry) -> bool {
        self.name == other.name && self.source_type == other.source_type
    }
}

/// A component descriptor. Fields this tool does not interpret are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub files: Vec<RegistryFile>,
    #[serde(default)]
    pub registry_dependencies: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A file declared by a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryFile {
    pub path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegistryFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_uses_camel_case_and_snake_source_type() {
        let entry = ManifestEntry {
            name: "button".into(),
            source_url: Some("https://x/button.json".into()),
            source_type: SourceType::UrlSuccess,
            registry_item: None,
            fetch_error: None,
        };
        let v = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            v,
            json!({"name": "button", "sourceUrl": "https://x/button.json", "sourceType": "url_success"})
        );
    }

    #[test]
    fn descriptor_keeps_unknown_fields() {
        let raw = json!({
            "name": "card",
            "type": "registry:ui",
            "files": [{"path": "/ui/card.tsx", "content": "export {}"}],
            "registryDependencies": ["https://x/button.json"]
        });
        let item: RegistryItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(item.files[0].path, "/ui/card.tsx");
        assert_eq!(item.registry_dependencies.len(), 1);
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn identity_is_name_and_source_type() {
        let a = ManifestEntry {
            name: "button".into(),
            source_url: None,
            source_type: SourceType::DirectName,
            registry_item: None,
            fetch_error: None,
        };
        let mut b = a.clone();
        assert!(a.same_identity(&b));
        b.source_type = SourceType::UrlSuccess;
        assert!(!a.same_identity(&b));
    }
}
