use serde::Deserialize;
use serde_json::Value;

use super::{lenient, non_empty};
use crate::{CanonicalRef, Canonicalizer, ItemKind};

/// A skin pack's `skins.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkinCatalogDefinition {
    serialize_name: Option<String>,
    localization_name: Option<String>,
    skins: Vec<Skin>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct Skin {
    localization_name: Option<String>,
    texture: Option<String>,
}

impl SkinCatalogDefinition {
    pub fn from_json(value: &Value) -> Self {
        lenient(value, "skin catalog")
    }

    pub fn identifier(&self) -> Option<&str> {
        non_empty(&self.serialize_name).or_else(|| non_empty(&self.localization_name))
    }

    pub fn texture_paths(&self) -> impl Iterator<Item = &str> {
        self.skins.iter().filter_map(|skin| non_empty(&skin.texture))
    }

    /// Display names of the skins, parallel to the skin list.
    pub fn skin_names(&self) -> Vec<&str> {
        self.skins
            .iter()
            .map(|skin| non_empty(&skin.localization_name).unwrap_or_default())
            .collect()
    }

    pub fn referenced_paths(&self, canonicalizer: &Canonicalizer) -> Vec<CanonicalRef> {
        self.texture_paths()
            .map(|texture| CanonicalRef::pack_path(canonicalizer, texture, ItemKind::Texture))
            .collect()
    }
}
