use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::{lenient, non_empty};
use crate::{CanonicalRef, Canonicalizer, ItemKind};

/// `terrain_texture.json` or `item_texture.json`: short texture names mapped
/// to one or more texture paths.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextureCatalogDefinition {
    resource_pack_name: Option<String>,
    texture_name: Option<String>,
    texture_data: IndexMap<String, Value>,
}

impl TextureCatalogDefinition {
    pub fn from_json(value: &Value) -> Self {
        lenient(value, "texture catalog")
    }

    pub fn identifier(&self) -> Option<&str> {
        non_empty(&self.texture_name)
    }

    pub fn resource_pack_name(&self) -> Option<&str> {
        non_empty(&self.resource_pack_name)
    }

    pub fn texture_ids(&self) -> impl Iterator<Item = &str> {
        self.texture_data
            .keys()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
    }

    /// Every path named by an entry. An entry's `textures` may be a string, a
    /// list, an object with `path`, or an object with `variations`.
    pub fn texture_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        for entry in self.texture_data.values() {
            if let Some(textures) = entry.get("textures") {
                collect_paths(textures, &mut paths);
            }
        }
        paths
    }

    pub fn referenced_paths(&self, canonicalizer: &Canonicalizer) -> Vec<CanonicalRef> {
        self.texture_paths()
            .into_iter()
            .map(|path| CanonicalRef::pack_path(canonicalizer, path, ItemKind::Texture))
            .collect()
    }
}

fn collect_paths<'a>(value: &'a Value, paths: &mut Vec<&'a str>) {
    match value {
        Value::String(path) if !path.trim().is_empty() => paths.push(path),
        Value::Array(values) => {
            for value in values {
                collect_paths(value, paths);
            }
        }
        Value::Object(map) => {
            if let Some(path) = map.get("path") {
                collect_paths(path, paths);
            }
            if let Some(variations) = map.get("variations") {
                collect_paths(variations, paths);
            }
        }
        _ => {}
    }
}
