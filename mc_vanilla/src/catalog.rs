use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use lazy_static::lazy_static;
use mc_model::{
    CanonicalRef, ItemKind, MatchScope, ReferenceCategory, SimpleReference, canonicalize,
    dedup_references, sort_references,
};
use regex::Regex;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::CatalogError;

const EMBEDDED_CATALOG: &str = include_str!("../data/vanilla_catalog.json");

lazy_static! {
    static ref NAMESPACED_ID: Regex =
        Regex::new(r"^minecraft:[a-z0-9_]+(?:[./][a-z0-9_]+)*$").unwrap();
    static ref SOUND_ID: Regex = Regex::new(r"^[a-z0-9_]+(?:\.[a-z0-9_]+)*$").unwrap();
    static ref TEXTURE_ID: Regex = Regex::new(r"^[a-z0-9_]+$").unwrap();
}

static GLOBAL: OnceLock<Arc<VanillaCatalog>> = OnceLock::new();

/// Where the built-in metadata comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VanillaSource {
    /// The copy compiled into this crate.
    Embedded,
    File(PathBuf),
    Json(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CatalogEntry {
    Id(String),
    Detailed {
        id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        icon: Option<String>,
    },
}

impl CatalogEntry {
    fn id(&self) -> &str {
        match self {
            CatalogEntry::Id(id) | CatalogEntry::Detailed { id, .. } => id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogMetadata {
    block_types: Vec<CatalogEntry>,
    entity_types: Vec<CatalogEntry>,
    item_types: Vec<CatalogEntry>,
    sound_definitions: Vec<CatalogEntry>,
    terrain_textures: Vec<CatalogEntry>,
    item_textures: Vec<CatalogEntry>,
    /// Engine ids that are not lookup categories (particles, worldgen).
    identifiers: Vec<String>,
    texture_paths: Vec<String>,
    sound_files: Vec<String>,
}

impl CatalogMetadata {
    fn entries(&self, category: ReferenceCategory) -> &[CatalogEntry] {
        match category {
            ReferenceCategory::BlockType => &self.block_types,
            ReferenceCategory::EntityType => &self.entity_types,
            ReferenceCategory::ItemType => &self.item_types,
            ReferenceCategory::SoundDefinition => &self.sound_definitions,
            ReferenceCategory::TerrainTexture => &self.terrain_textures,
            ReferenceCategory::ItemTexture => &self.item_textures,
        }
    }
}

/// Lower-cased ids and canonical asset paths, for classifying unresolved references.
#[derive(Debug, Default)]
struct TokenIndex {
    identifiers: HashSet<String>,
    texture_paths: HashSet<String>,
    sound_files: HashSet<String>,
}

/// Built-in reference lists. Each list is populated at most once and never
/// invalidated; concurrent first callers share one in-flight load.
#[derive(Debug)]
pub struct VanillaCatalog {
    source: VanillaSource,
    metadata: OnceCell<Arc<CatalogMetadata>>,
    references: [OnceCell<Arc<Vec<SimpleReference>>>; ReferenceCategory::ALL.len()],
    tokens: OnceCell<Arc<TokenIndex>>,
}

impl VanillaCatalog {
    pub fn new(source: VanillaSource) -> Self {
        Self {
            source,
            metadata: OnceCell::new(),
            references: std::array::from_fn(|_| OnceCell::new()),
            tokens: OnceCell::new(),
        }
    }

    pub fn embedded() -> Self {
        Self::new(VanillaSource::Embedded)
    }

    /// The process-wide catalog over the embedded metadata.
    pub fn global() -> Arc<VanillaCatalog> {
        GLOBAL
            .get_or_init(|| Arc::new(VanillaCatalog::embedded()))
            .clone()
    }

    pub fn source(&self) -> &VanillaSource {
        &self.source
    }

    async fn metadata(&self) -> Result<Arc<CatalogMetadata>, CatalogError> {
        self.metadata
            .get_or_try_init(|| async {
                let metadata: CatalogMetadata = match &self.source {
                    VanillaSource::Embedded => serde_json::from_str(EMBEDDED_CATALOG)?,
                    VanillaSource::Json(json) => serde_json::from_str(json)?,
                    VanillaSource::File(path) => {
                        let json = tokio::fs::read_to_string(path).await.map_err(|source| {
                            CatalogError::Read {
                                path: path.clone(),
                                source,
                            }
                        })?;
                        serde_json::from_str(&json)?
                    }
                };
                tracing::debug!("loaded vanilla catalog from {:?}", self.source);
                Ok::<_, CatalogError>(Arc::new(metadata))
            })
            .await
            .cloned()
    }

    /// Sorted built-in references for one category, filtered to well-formed ids.
    pub async fn references(
        &self,
        category: ReferenceCategory,
    ) -> Result<Arc<Vec<SimpleReference>>, CatalogError> {
        self.references[category.index()]
            .get_or_try_init(|| async {
                let metadata = self.metadata().await?;
                let description = category.vanilla_description();

                let mut references: Vec<SimpleReference> = metadata
                    .entries(category)
                    .iter()
                    .filter(|entry| is_recognized(category, entry.id()))
                    .map(|entry| {
                        let reference =
                            SimpleReference::new(entry.id()).with_description(description.clone());
                        match entry {
                            CatalogEntry::Id(_) => reference,
                            CatalogEntry::Detailed { title, icon, .. } => {
                                reference.with_title(title.clone()).with_icon(icon.clone())
                            }
                        }
                    })
                    .collect();
                dedup_references(&mut references);
                sort_references(&mut references);

                tracing::debug!("{} vanilla {} references", references.len(), category);
                Ok::<_, CatalogError>(Arc::new(references))
            })
            .await
            .cloned()
    }

    pub async fn get_block_type_refs(&self) -> Result<Arc<Vec<SimpleReference>>, CatalogError> {
        self.references(ReferenceCategory::BlockType).await
    }

    pub async fn get_entity_type_refs(&self) -> Result<Arc<Vec<SimpleReference>>, CatalogError> {
        self.references(ReferenceCategory::EntityType).await
    }

    pub async fn get_item_type_refs(&self) -> Result<Arc<Vec<SimpleReference>>, CatalogError> {
        self.references(ReferenceCategory::ItemType).await
    }

    pub async fn get_sound_definition_refs(
        &self,
    ) -> Result<Arc<Vec<SimpleReference>>, CatalogError> {
        self.references(ReferenceCategory::SoundDefinition).await
    }

    pub async fn get_terrain_texture_refs(
        &self,
    ) -> Result<Arc<Vec<SimpleReference>>, CatalogError> {
        self.references(ReferenceCategory::TerrainTexture).await
    }

    pub async fn get_item_texture_refs(&self) -> Result<Arc<Vec<SimpleReference>>, CatalogError> {
        self.references(ReferenceCategory::ItemTexture).await
    }

    async fn tokens(&self) -> Result<Arc<TokenIndex>, CatalogError> {
        self.tokens
            .get_or_try_init(|| async {
                let metadata = self.metadata().await?;
                let mut index = TokenIndex::default();

                // Same filter as the reference lists: a rejected id is not a token.
                for category in ReferenceCategory::ALL {
                    index.identifiers.extend(
                        metadata
                            .entries(category)
                            .iter()
                            .filter(|entry| is_recognized(category, entry.id()))
                            .map(|entry| entry.id().to_lowercase()),
                    );
                }
                index
                    .identifiers
                    .extend(metadata.identifiers.iter().map(|id| id.to_lowercase()));
                index
                    .texture_paths
                    .extend(metadata.texture_paths.iter().map(|path| canonicalize(path)));
                index
                    .sound_files
                    .extend(metadata.sound_files.iter().map(|path| canonicalize(path)));

                Ok::<_, CatalogError>(Arc::new(index))
            })
            .await
            .cloned()
    }

    /// Whether an unresolved reference names something the engine ships with.
    pub async fn is_vanilla_token(&self, reference: &CanonicalRef) -> Result<bool, CatalogError> {
        let tokens = self.tokens().await?;

        let known = match reference.scope {
            MatchScope::Identifier => {
                let id = reference.key.to_lowercase();
                tokens.identifiers.contains(&id)
                    || (!id.contains(':')
                        && tokens.identifiers.contains(&format!("minecraft:{id}")))
            }
            MatchScope::PackPath => {
                let path = canonicalize(&reference.original);
                match reference.target {
                    Some(ItemKind::Texture) => tokens.texture_paths.contains(&path),
                    Some(ItemKind::Audio) => tokens.sound_files.contains(&path),
                    _ => false,
                }
            }
        };
        Ok(known)
    }
}

fn is_recognized(category: ReferenceCategory, id: &str) -> bool {
    match category {
        ReferenceCategory::BlockType
        | ReferenceCategory::EntityType
        | ReferenceCategory::ItemType => NAMESPACED_ID.is_match(id),
        ReferenceCategory::SoundDefinition => SOUND_ID.is_match(id),
        ReferenceCategory::TerrainTexture | ReferenceCategory::ItemTexture => {
            TEXTURE_ID.is_match(id)
        }
    }
}
