use indexmap::IndexMap;
use serde_json::Value;

use crate::{CanonicalRef, Canonicalizer, ItemKind};

/// `sounds/sound_definitions.json`. Current files nest the definitions under
/// `sound_definitions`; older files put them at the top level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoundDefinitionCatalog {
    format_version: Option<String>,
    definitions: IndexMap<String, SoundDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoundDefinition {
    pub category: Option<String>,
    pub files: Vec<String>,
}

impl SoundDefinitionCatalog {
    pub fn from_json(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            tracing::debug!("malformed sound definition catalog: not an object");
            return Self::default();
        };

        let format_version = root
            .get("format_version")
            .and_then(Value::as_str)
            .map(str::to_string);

        let entries = match root.get("sound_definitions") {
            Some(Value::Object(nested)) => nested,
            Some(_) => {
                tracing::debug!(
                    "malformed sound definition catalog: sound_definitions is not an object"
                );
                return Self {
                    format_version,
                    definitions: IndexMap::new(),
                };
            }
            None => root,
        };

        let definitions = entries
            .iter()
            .filter(|(id, _)| *id != "format_version" && !id.trim().is_empty())
            .filter_map(|(id, body)| {
                Some((id.trim().to_string(), SoundDefinition::from_json(body)?))
            })
            .collect();

        Self {
            format_version,
            definitions,
        }
    }

    pub fn format_version(&self) -> Option<&str> {
        self.format_version.as_deref()
    }

    pub fn sound_ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn definition(&self, id: &str) -> Option<&SoundDefinition> {
        self.definitions.get(id)
    }

    pub fn referenced_paths(&self, canonicalizer: &Canonicalizer) -> Vec<CanonicalRef> {
        self.definitions
            .values()
            .flat_map(|definition| definition.files.iter())
            .map(|file| CanonicalRef::pack_path(canonicalizer, file, ItemKind::Audio))
            .collect()
    }
}

impl SoundDefinition {
    fn from_json(value: &Value) -> Option<Self> {
        let body = value.as_object()?;
        let category = body
            .get("category")
            .and_then(Value::as_str)
            .map(str::to_string);
        let files = body
            .get("sounds")
            .and_then(Value::as_array)
            .map(|sounds| {
                sounds
                    .iter()
                    .filter_map(|sound| match sound {
                        Value::String(name) => Some(name.as_str()),
                        Value::Object(sound) => sound.get("name").and_then(Value::as_str),
                        _ => None,
                    })
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self { category, files })
    }
}
