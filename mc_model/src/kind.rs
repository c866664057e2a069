use std::fmt;

use glob::{MatchOptions, Pattern};
use lazy_static::lazy_static;
use serde::Serialize;

/// Every kind of content artifact a project can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    EntityResource,
    EntityBehavior,
    BlockType,
    ItemType,
    ParticleEffect,
    SkinCatalog,
    JigsawStructure,
    JigsawTemplatePool,
    JigsawProcessorList,
    JigsawStructureSet,
    Structure,
    Texture,
    TerrainTextureCatalog,
    ItemTextureCatalog,
    SoundDefinitionCatalog,
    Audio,
    PackManifest,
    Unknown,
}

/// Where the pack root of an item is found, relative to the item's file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackAnchor {
    /// Nearest ancestor folder with this name; the pack root is its parent.
    Folder(&'static str),
    /// The folder holding the file is itself the pack root.
    ContainingFolder,
    /// The kind makes no path references.
    None,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

lazy_static! {
    /// Ordered: the first matching pattern decides the kind.
    static ref KIND_PATTERNS: Vec<(Pattern, ItemKind)> = [
        ("**/manifest.json", ItemKind::PackManifest),
        ("**/skins.json", ItemKind::SkinCatalog),
        ("**/textures/terrain_texture.json", ItemKind::TerrainTextureCatalog),
        ("**/textures/item_texture.json", ItemKind::ItemTextureCatalog),
        ("**/sounds/sound_definitions.json", ItemKind::SoundDefinitionCatalog),
        ("**/particles/**/*.json", ItemKind::ParticleEffect),
        ("**/worldgen/structures/**/*.json", ItemKind::JigsawStructure),
        ("**/worldgen/template_pools/**/*.json", ItemKind::JigsawTemplatePool),
        ("**/worldgen/processors/**/*.json", ItemKind::JigsawProcessorList),
        ("**/worldgen/structure_sets/**/*.json", ItemKind::JigsawStructureSet),
        ("**/entity/**/*.json", ItemKind::EntityResource),
        ("**/entities/**/*.json", ItemKind::EntityBehavior),
        ("**/blocks/**/*.json", ItemKind::BlockType),
        ("**/items/**/*.json", ItemKind::ItemType),
        ("**/*.mcstructure", ItemKind::Structure),
        ("**/*.png", ItemKind::Texture),
        ("**/*.jpg", ItemKind::Texture),
        ("**/*.jpeg", ItemKind::Texture),
        ("**/*.tga", ItemKind::Texture),
        ("**/*.ogg", ItemKind::Audio),
        ("**/*.wav", ItemKind::Audio),
        ("**/*.fsb", ItemKind::Audio),
    ]
    .into_iter()
    .filter_map(|(pattern, kind)| Pattern::new(pattern).ok().map(|pattern| (pattern, kind)))
    .collect();
}

impl ItemKind {
    /// Classify a project-relative path by folder and file naming conventions.
    pub fn infer(path: &str) -> ItemKind {
        let path = path.replace('\\', "/");
        KIND_PATTERNS
            .iter()
            .find(|(pattern, _)| pattern.matches_with(&path, MATCH_OPTIONS))
            .map(|(_, kind)| *kind)
            .unwrap_or(ItemKind::Unknown)
    }

    /// Whether the item's body is JSON that a definition wrapper can read.
    pub fn is_json(self) -> bool {
        !matches!(
            self,
            ItemKind::Structure | ItemKind::Texture | ItemKind::Audio | ItemKind::Unknown
        )
    }

    pub fn pack_anchor(self) -> PackAnchor {
        match self {
            ItemKind::ParticleEffect => PackAnchor::Folder("particles"),
            ItemKind::EntityResource => PackAnchor::Folder("entity"),
            ItemKind::TerrainTextureCatalog | ItemKind::ItemTextureCatalog => {
                PackAnchor::Folder("textures")
            }
            ItemKind::SoundDefinitionCatalog => PackAnchor::Folder("sounds"),
            ItemKind::JigsawTemplatePool => PackAnchor::Folder("worldgen"),
            ItemKind::SkinCatalog | ItemKind::PackManifest => PackAnchor::ContainingFolder,
            ItemKind::EntityBehavior
            | ItemKind::BlockType
            | ItemKind::ItemType
            | ItemKind::JigsawStructure
            | ItemKind::JigsawProcessorList
            | ItemKind::JigsawStructureSet
            | ItemKind::Structure
            | ItemKind::Texture
            | ItemKind::Audio
            | ItemKind::Unknown => PackAnchor::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::EntityResource => "entity-resource",
            ItemKind::EntityBehavior => "entity-behavior",
            ItemKind::BlockType => "block-type",
            ItemKind::ItemType => "item-type",
            ItemKind::ParticleEffect => "particle-effect",
            ItemKind::SkinCatalog => "skin-catalog",
            ItemKind::JigsawStructure => "jigsaw-structure",
            ItemKind::JigsawTemplatePool => "jigsaw-template-pool",
            ItemKind::JigsawProcessorList => "jigsaw-processor-list",
            ItemKind::JigsawStructureSet => "jigsaw-structure-set",
            ItemKind::Structure => "structure",
            ItemKind::Texture => "texture",
            ItemKind::TerrainTextureCatalog => "terrain-texture-catalog",
            ItemKind::ItemTextureCatalog => "item-texture-catalog",
            ItemKind::SoundDefinitionCatalog => "sound-definition-catalog",
            ItemKind::Audio => "audio",
            ItemKind::PackManifest => "pack-manifest",
            ItemKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
