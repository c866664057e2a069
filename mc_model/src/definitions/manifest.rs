use serde::Deserialize;
use serde_json::Value;

use super::{lenient, non_empty};

/// What a pack's modules declare it to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackType {
    Resources,
    Data,
    SkinPack,
    WorldTemplate,
    Unknown,
}

impl PackType {
    fn from_module_type(module_type: &str) -> Self {
        match module_type.trim().to_ascii_lowercase().as_str() {
            "resources" => PackType::Resources,
            "data" | "script" | "javascript" => PackType::Data,
            "skin_pack" => PackType::SkinPack,
            "world_template" => PackType::WorldTemplate,
            _ => PackType::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PackManifestDefinition {
    header: Header,
    modules: Vec<Module>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct Header {
    name: Option<String>,
    uuid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct Module {
    #[serde(rename = "type")]
    module_type: Option<String>,
}

impl PackManifestDefinition {
    pub fn from_json(value: &Value) -> Self {
        lenient(value, "pack manifest")
    }

    pub fn identifier(&self) -> Option<&str> {
        non_empty(&self.header.uuid).or_else(|| non_empty(&self.header.name))
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(&self.header.name)
    }

    /// The first module with a recognised type decides the pack type.
    pub fn pack_type(&self) -> PackType {
        self.modules
            .iter()
            .filter_map(|module| non_empty(&module.module_type))
            .map(PackType::from_module_type)
            .find(|pack_type| *pack_type != PackType::Unknown)
            .unwrap_or(PackType::Unknown)
    }
}
