use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Display metadata for one image: used as a texture source by the scene
/// builder and as dialog content when a gallery plane is picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub id: String,
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_hint: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(alias = "placeholderImages")]
    images: Vec<ContentEntry>,
}

/// Keyed lookup from an opaque image id to its metadata.
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    entries: HashMap<String, ContentEntry>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ContentEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.id.clone(), entry))
            .collect();
        Self { entries }
    }

    /// Parse `{ "images": [ { "id", "imageUrl", "description", "imageHint" } ] }`.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::from_entries(file.images))
    }

    /// Look up an entry. Returns None if not found.
    pub fn get(&self, id: &str) -> Option<&ContentEntry> {
        self.entries.get(id)
    }

    /// Image URL for a texture id, or `AssetMissing`.
    pub fn texture_url(&self, id: &str) -> Result<&str> {
        self.entries
            .get(id)
            .map(|entry| entry.image_url.as_str())
            .ok_or_else(|| EngineError::AssetMissing { id: id.to_string() })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
