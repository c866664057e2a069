use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// The reference lists offered to editors, one per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceCategory {
    BlockType,
    EntityType,
    ItemType,
    SoundDefinition,
    TerrainTexture,
    ItemTexture,
}

impl ReferenceCategory {
    pub const ALL: [ReferenceCategory; 6] = [
        ReferenceCategory::BlockType,
        ReferenceCategory::EntityType,
        ReferenceCategory::ItemType,
        ReferenceCategory::SoundDefinition,
        ReferenceCategory::TerrainTexture,
        ReferenceCategory::ItemTexture,
    ];

    /// Parse a category name case-insensitively. Accepts the camelCase names
    /// editors use as well as snake_case spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "blocktype" | "block" => Some(ReferenceCategory::BlockType),
            "entitytype" | "entity" => Some(ReferenceCategory::EntityType),
            "itemtype" | "item" => Some(ReferenceCategory::ItemType),
            "sounddefinition" | "sound" => Some(ReferenceCategory::SoundDefinition),
            "terraintexture" => Some(ReferenceCategory::TerrainTexture),
            "itemtexture" => Some(ReferenceCategory::ItemTexture),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceCategory::BlockType => "blockType",
            ReferenceCategory::EntityType => "entityType",
            ReferenceCategory::ItemType => "itemType",
            ReferenceCategory::SoundDefinition => "soundDefinition",
            ReferenceCategory::TerrainTexture => "terrainTexture",
            ReferenceCategory::ItemTexture => "itemTexture",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    fn noun(self) -> &'static str {
        match self {
            ReferenceCategory::BlockType => "block type",
            ReferenceCategory::EntityType => "entity type",
            ReferenceCategory::ItemType => "item type",
            ReferenceCategory::SoundDefinition => "sound definition",
            ReferenceCategory::TerrainTexture => "terrain texture",
            ReferenceCategory::ItemTexture => "item texture",
        }
    }

    /// Description for a reference defined by a project file.
    pub fn project_description(self, source_path: &str) -> String {
        format!("Custom {} defined in {}", self.noun(), source_path)
    }

    /// Description for a built-in reference.
    pub fn vanilla_description(self) -> String {
        format!("Built-in {}", self.noun())
    }
}

impl fmt::Display for ReferenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleReference {
    pub id: String,
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_image: Option<String>,
}

impl SimpleReference {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let title = humanize_identifier(&id);
        Self {
            id,
            title: (!title.is_empty()).then_some(title),
            description: None,
            icon_image: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon_image: Option<String>) -> Self {
        self.icon_image = icon_image;
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        if title.is_some() {
            self.title = title;
        }
        self
    }

    fn sort_name(&self) -> Option<String> {
        match &self.title {
            Some(title) => Some(title.to_lowercase()),
            None if !self.id.is_empty() => Some(self.id.clone()),
            None => None,
        }
    }
}

/// Turn `minecraft:red_sandstone` into `Red Sandstone`.
pub fn humanize_identifier(id: &str) -> String {
    let name = id.rsplit_once(':').map_or(id, |(_, name)| name);

    name.split(|c: char| c == '_' || c == '.' || c == '/' || c == '-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stable sort: titles case-insensitively, untitled entries by raw id.
/// Entries with neither stay where they were; the rest are sorted around them.
pub fn sort_references(references: &mut [SimpleReference]) {
    let mut keyed: Vec<(usize, String)> = references
        .iter()
        .enumerate()
        .filter_map(|(slot, reference)| Some((slot, reference.sort_name()?)))
        .collect();
    let slots: Vec<usize> = keyed.iter().map(|(slot, _)| *slot).collect();
    keyed.sort_by(|(_, a), (_, b)| a.cmp(b));

    let sorted: Vec<SimpleReference> = keyed
        .iter()
        .map(|(slot, _)| references[*slot].clone())
        .collect();
    for (slot, reference) in slots.into_iter().zip(sorted) {
        references[slot] = reference;
    }
}

/// Drop later entries whose id was already seen. First occurrence wins.
pub fn dedup_references(references: &mut Vec<SimpleReference>) {
    let mut seen = HashSet::new();
    references.retain(|reference| seen.insert(reference.id.clone()));
}
