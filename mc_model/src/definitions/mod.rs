//! Typed views over item bodies.
//!
//! Every wrapper is lenient: malformed-but-present JSON yields a wrapper with
//! no identifier and no references rather than an error.

mod behavior;
mod entity;
mod jigsaw;
mod manifest;
mod particle;
mod skins;
mod sound;
mod texture_catalog;

pub use behavior::BehaviorDefinition;
pub use entity::EntityResourceDefinition;
pub use jigsaw::{
    JigsawStructureDefinition, ProcessorListDefinition, StructureSetDefinition,
    TemplatePoolDefinition,
};
pub use manifest::{PackManifestDefinition, PackType};
pub use particle::ParticleEffectDefinition;
pub use skins::SkinCatalogDefinition;
pub use sound::{SoundDefinition, SoundDefinitionCatalog};
pub use texture_catalog::TextureCatalogDefinition;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{CanonicalRef, Canonicalizer, ItemKind, ReferenceCategory};

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    EntityResource(EntityResourceDefinition),
    EntityBehavior(BehaviorDefinition),
    BlockType(BehaviorDefinition),
    ItemType(BehaviorDefinition),
    ParticleEffect(ParticleEffectDefinition),
    SkinCatalog(SkinCatalogDefinition),
    JigsawStructure(JigsawStructureDefinition),
    JigsawTemplatePool(TemplatePoolDefinition),
    JigsawProcessorList(ProcessorListDefinition),
    JigsawStructureSet(StructureSetDefinition),
    TerrainTextureCatalog(TextureCatalogDefinition),
    ItemTextureCatalog(TextureCatalogDefinition),
    SoundDefinitionCatalog(SoundDefinitionCatalog),
    PackManifest(PackManifestDefinition),
}

impl Definition {
    /// Build the wrapper for `kind` from a parsed body. Kinds without a JSON
    /// body have no wrapper.
    pub fn parse(kind: ItemKind, value: &Value) -> Option<Definition> {
        let definition = match kind {
            ItemKind::EntityResource => {
                Definition::EntityResource(EntityResourceDefinition::from_json(value))
            }
            ItemKind::EntityBehavior => {
                Definition::EntityBehavior(BehaviorDefinition::from_json(value, "minecraft:entity"))
            }
            ItemKind::BlockType => {
                Definition::BlockType(BehaviorDefinition::from_json(value, "minecraft:block"))
            }
            ItemKind::ItemType => {
                Definition::ItemType(BehaviorDefinition::from_json(value, "minecraft:item"))
            }
            ItemKind::ParticleEffect => {
                Definition::ParticleEffect(ParticleEffectDefinition::from_json(value))
            }
            ItemKind::SkinCatalog => {
                Definition::SkinCatalog(SkinCatalogDefinition::from_json(value))
            }
            ItemKind::JigsawStructure => {
                Definition::JigsawStructure(JigsawStructureDefinition::from_json(value))
            }
            ItemKind::JigsawTemplatePool => {
                Definition::JigsawTemplatePool(TemplatePoolDefinition::from_json(value))
            }
            ItemKind::JigsawProcessorList => {
                Definition::JigsawProcessorList(ProcessorListDefinition::from_json(value))
            }
            ItemKind::JigsawStructureSet => {
                Definition::JigsawStructureSet(StructureSetDefinition::from_json(value))
            }
            ItemKind::TerrainTextureCatalog => {
                Definition::TerrainTextureCatalog(TextureCatalogDefinition::from_json(value))
            }
            ItemKind::ItemTextureCatalog => {
                Definition::ItemTextureCatalog(TextureCatalogDefinition::from_json(value))
            }
            ItemKind::SoundDefinitionCatalog => {
                Definition::SoundDefinitionCatalog(SoundDefinitionCatalog::from_json(value))
            }
            ItemKind::PackManifest => {
                Definition::PackManifest(PackManifestDefinition::from_json(value))
            }
            ItemKind::Structure | ItemKind::Texture | ItemKind::Audio | ItemKind::Unknown => {
                return None;
            }
        };
        Some(definition)
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Definition::EntityResource(_) => ItemKind::EntityResource,
            Definition::EntityBehavior(_) => ItemKind::EntityBehavior,
            Definition::BlockType(_) => ItemKind::BlockType,
            Definition::ItemType(_) => ItemKind::ItemType,
            Definition::ParticleEffect(_) => ItemKind::ParticleEffect,
            Definition::SkinCatalog(_) => ItemKind::SkinCatalog,
            Definition::JigsawStructure(_) => ItemKind::JigsawStructure,
            Definition::JigsawTemplatePool(_) => ItemKind::JigsawTemplatePool,
            Definition::JigsawProcessorList(_) => ItemKind::JigsawProcessorList,
            Definition::JigsawStructureSet(_) => ItemKind::JigsawStructureSet,
            Definition::TerrainTextureCatalog(_) => ItemKind::TerrainTextureCatalog,
            Definition::ItemTextureCatalog(_) => ItemKind::ItemTextureCatalog,
            Definition::SoundDefinitionCatalog(_) => ItemKind::SoundDefinitionCatalog,
            Definition::PackManifest(_) => ItemKind::PackManifest,
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        match self {
            Definition::EntityResource(definition) => definition.identifier(),
            Definition::EntityBehavior(definition)
            | Definition::BlockType(definition)
            | Definition::ItemType(definition) => definition.identifier(),
            Definition::ParticleEffect(definition) => definition.identifier(),
            Definition::SkinCatalog(definition) => definition.identifier(),
            Definition::JigsawStructure(definition) => definition.identifier(),
            Definition::JigsawTemplatePool(definition) => definition.identifier(),
            Definition::JigsawProcessorList(definition) => definition.identifier(),
            Definition::JigsawStructureSet(definition) => definition.identifier(),
            Definition::TerrainTextureCatalog(definition)
            | Definition::ItemTextureCatalog(definition) => definition.identifier(),
            Definition::SoundDefinitionCatalog(_) => None,
            Definition::PackManifest(definition) => definition.identifier(),
        }
    }

    /// The symbolic references this definition makes, canonicalized.
    pub fn referenced_paths(&self, canonicalizer: &Canonicalizer) -> Vec<CanonicalRef> {
        match self {
            Definition::EntityResource(definition) => definition.referenced_paths(canonicalizer),
            Definition::ParticleEffect(definition) => definition.referenced_paths(canonicalizer),
            Definition::SkinCatalog(definition) => definition.referenced_paths(canonicalizer),
            Definition::JigsawStructure(definition) => definition.referenced_paths(),
            Definition::JigsawTemplatePool(definition) => {
                definition.referenced_paths(canonicalizer)
            }
            Definition::JigsawStructureSet(definition) => definition.referenced_paths(),
            Definition::TerrainTextureCatalog(definition)
            | Definition::ItemTextureCatalog(definition) => {
                definition.referenced_paths(canonicalizer)
            }
            Definition::SoundDefinitionCatalog(definition) => {
                definition.referenced_paths(canonicalizer)
            }
            Definition::EntityBehavior(_)
            | Definition::BlockType(_)
            | Definition::ItemType(_)
            | Definition::JigsawProcessorList(_)
            | Definition::PackManifest(_) => Vec::new(),
        }
    }

    /// The (category, key) pairs this definition contributes to the content index.
    pub fn index_entries(&self) -> Vec<(ReferenceCategory, String)> {
        let single = |category: ReferenceCategory, id: Option<&str>| {
            id.map(|id| vec![(category, id.to_string())]).unwrap_or_default()
        };

        match self {
            Definition::EntityBehavior(definition) => {
                single(ReferenceCategory::EntityType, definition.identifier())
            }
            Definition::EntityResource(definition) => {
                single(ReferenceCategory::EntityType, definition.identifier())
            }
            Definition::BlockType(definition) => {
                single(ReferenceCategory::BlockType, definition.identifier())
            }
            Definition::ItemType(definition) => {
                single(ReferenceCategory::ItemType, definition.identifier())
            }
            Definition::SoundDefinitionCatalog(definition) => definition
                .sound_ids()
                .map(|id| (ReferenceCategory::SoundDefinition, id.to_string()))
                .collect(),
            Definition::TerrainTextureCatalog(definition) => definition
                .texture_ids()
                .map(|id| (ReferenceCategory::TerrainTexture, id.to_string()))
                .collect(),
            Definition::ItemTextureCatalog(definition) => definition
                .texture_ids()
                .map(|id| (ReferenceCategory::ItemTexture, id.to_string()))
                .collect(),
            Definition::ParticleEffect(_)
            | Definition::SkinCatalog(_)
            | Definition::JigsawStructure(_)
            | Definition::JigsawTemplatePool(_)
            | Definition::JigsawProcessorList(_)
            | Definition::JigsawStructureSet(_)
            | Definition::PackManifest(_) => Vec::new(),
        }
    }
}

/// Deserialize a wrapper body, falling back to an empty body on shape errors.
fn lenient<T: DeserializeOwned + Default>(value: &Value, what: &str) -> T {
    match T::deserialize(value) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("malformed {} definition: {}", what, e);
            T::default()
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
