use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use mc_model::{Content, ContentSource, ItemKind, LowerCaseHashMap};

use crate::content_index::ContentIndex;
use crate::item::{ProjectItem, ProjectItemRef};
use crate::lookup::LookupCache;
use crate::pack_root::{PackRegistry, PackRoot, locate_pack_root};
use crate::GraphError;

#[derive(Default)]
struct ItemTable {
    order: Vec<ProjectItemRef>,
    by_path: LowerCaseHashMap<ProjectItemRef>,
}

/// A set of content items plus the indexes derived from them.
pub struct Project {
    name: String,
    storage: RwLock<Option<Arc<dyn ContentSource>>>,
    items: RwLock<ItemTable>,
    packs: PackRegistry,
    content_generation: AtomicU64,
    content_index: ContentIndex,
    /// Content generation the index was last built from.
    info_set: tokio::sync::Mutex<Option<u64>>,
    lookup_cache: tokio::sync::Mutex<LookupCache>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: RwLock::new(None),
            items: RwLock::new(ItemTable::default()),
            packs: PackRegistry::new(),
            content_generation: AtomicU64::new(0),
            content_index: ContentIndex::new(),
            info_set: tokio::sync::Mutex::new(None),
            lookup_cache: tokio::sync::Mutex::new(LookupCache::new()),
        }
    }

    pub fn with_storage(name: impl Into<String>, storage: Arc<dyn ContentSource>) -> Self {
        let project = Self::new(name);
        project.attach_storage(storage);
        project
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Swap the storage backend. Loaded content is kept; new loads use `storage`.
    pub fn attach_storage(&self, storage: Arc<dyn ContentSource>) {
        *self.storage.write().unwrap_or_else(PoisonError::into_inner) = Some(storage);
        self.bump_generation();
    }

    pub fn storage(&self) -> Result<Arc<dyn ContentSource>, GraphError> {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(GraphError::StorageNotInitialized)
    }

    /// Add an item at `path`, inferring its kind. Adding an existing path
    /// returns the existing item.
    pub fn add_item(&self, path: &str) -> ProjectItemRef {
        self.add_item_with_kind(path, ItemKind::infer(path))
    }

    pub fn add_item_with_kind(&self, path: &str, kind: ItemKind) -> ProjectItemRef {
        let path = path.replace('\\', "/");
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = items.by_path.get(&path) {
            return existing.clone();
        }

        let item = Arc::new(ProjectItem::new(kind, path.clone()));
        items.order.push(item.clone());
        items.by_path.insert(&path, item.clone());
        drop(items);

        if kind == ItemKind::PackManifest {
            self.packs.register_manifest(&path);
        }
        self.bump_generation();
        item
    }

    /// Remove an item and every edge touching it.
    pub fn remove_item(&self, path: &str) -> Option<ProjectItemRef> {
        let removed = {
            let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
            let removed = items.by_path.remove(path)?;
            items.order.retain(|item| !Arc::ptr_eq(item, &removed));
            removed
        };

        removed.detach();
        if removed.kind == ItemKind::PackManifest {
            self.packs.unregister_manifest(&removed.path);
        }
        self.content_index.remove_item(&removed.path);
        self.bump_generation();
        Some(removed)
    }

    pub fn set_item_content(&self, path: &str, content: Option<Content>) -> Result<(), GraphError> {
        let item = self
            .item(path)
            .ok_or_else(|| GraphError::UnknownItem(path.to_string()))?;
        item.set_content(content);
        self.bump_generation();
        Ok(())
    }

    pub fn item(&self, path: &str) -> Option<ProjectItemRef> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_path
            .get(path)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of the item list in insertion order. Items added after the
    /// snapshot is taken are not in it.
    pub fn items_snapshot(&self) -> Vec<ProjectItemRef> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clone()
    }

    pub fn content_index(&self) -> &ContentIndex {
        &self.content_index
    }

    pub fn packs(&self) -> &PackRegistry {
        &self.packs
    }

    pub(crate) fn lookup_cache(&self) -> &tokio::sync::Mutex<LookupCache> {
        &self.lookup_cache
    }

    pub fn content_generation(&self) -> u64 {
        self.content_generation.load(Ordering::Acquire)
    }

    fn bump_generation(&self) {
        self.content_generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn locate_pack_root(&self, item: &ProjectItem) -> Option<PackRoot> {
        locate_pack_root(&item.path, item.kind.pack_anchor(), &self.packs)
    }

    /// Rebuild the content index if project content changed since it was
    /// last built. Concurrent callers wait for one rebuild.
    pub async fn ensure_info_set_generated(&self) -> Result<(), GraphError> {
        let mut generated = self.info_set.lock().await;
        let generation = self.content_generation();
        if *generated == Some(generation) {
            return Ok(());
        }

        let start = Instant::now();
        let storage = self.storage()?;
        let mut entries = Vec::new();

        for item in self.items_snapshot() {
            if !contributes_to_index(item.kind) {
                continue;
            }
            item.ensure_loaded(storage.as_ref()).await?;
            if let Some(definition) = item.definition() {
                entries.extend(
                    definition
                        .index_entries()
                        .into_iter()
                        .map(|(category, key)| (category, key, item.path.clone())),
                );
            }
        }

        let count = entries.len();
        self.content_index.rebuild(entries);
        *generated = Some(generation);

        tracing::info!(
            "built content index for {} with {} values in {:?}",
            self.name,
            count,
            start.elapsed()
        );
        Ok(())
    }
}

fn contributes_to_index(kind: ItemKind) -> bool {
    matches!(
        kind,
        ItemKind::EntityBehavior
            | ItemKind::EntityResource
            | ItemKind::BlockType
            | ItemKind::ItemType
            | ItemKind::SoundDefinitionCatalog
            | ItemKind::TerrainTextureCatalog
            | ItemKind::ItemTextureCatalog
    )
}

impl Drop for Project {
    fn drop(&mut self) {
        let items = self.items.get_mut().unwrap_or_else(PoisonError::into_inner);
        for item in &items.order {
            item.clear_children();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_model::{MemorySource, ReferenceCategory};

    #[test]
    fn test_add_and_remove_items() {
        let project = Project::new("demo");
        let manifest = project.add_item("packs\\RP\\manifest.json");
        assert_eq!(manifest.kind, ItemKind::PackManifest);
        assert_eq!(manifest.path, "packs/RP/manifest.json");
        assert_eq!(project.packs().roots(), vec![PackRoot::new("packs/RP")]);

        let texture = project.add_item("packs/RP/textures/particle/flame.png");
        assert_eq!(texture.kind, ItemKind::Texture);
        assert!(Arc::ptr_eq(&texture, &project.add_item("PACKS/rp/textures/particle/flame.png")));
        assert_eq!(project.len(), 2);

        let generation = project.content_generation();
        assert!(project.remove_item("packs/RP/manifest.json").is_some());
        assert!(project.content_generation() > generation);
        assert!(project.packs().roots().is_empty());
        assert!(project.remove_item("packs/RP/manifest.json").is_none());
    }

    #[test]
    fn test_set_content_on_unknown_item() {
        let project = Project::new("demo");
        assert!(matches!(
            project.set_item_content("nope.json", None),
            Err(GraphError::UnknownItem(path)) if path == "nope.json"
        ));
    }

    #[tokio::test]
    async fn test_info_set_requires_storage() {
        let project = Project::new("demo");
        project.add_item("BP/blocks/ruby_ore.json");
        assert!(matches!(
            project.ensure_info_set_generated().await,
            Err(GraphError::StorageNotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_info_set_regenerates_on_change() {
        let storage = Arc::new(MemorySource::new());
        storage.insert(
            "BP/blocks/ruby_ore.json",
            r#"{"minecraft:block": {"description": {"identifier": "demo:ruby_ore"}}}"#,
        );
        let project = Project::with_storage("demo", storage.clone());
        project.add_item("BP/blocks/ruby_ore.json");

        project.ensure_info_set_generated().await.unwrap();
        let iteration = project.content_index().iteration();
        let blocks = project.content_index().get_all(&[ReferenceCategory::BlockType]);
        assert!(blocks.values.contains_key("demo:ruby_ore"));

        project.ensure_info_set_generated().await.unwrap();
        assert_eq!(project.content_index().iteration(), iteration);

        project
            .set_item_content(
                "BP/blocks/ruby_ore.json",
                Some(Content::from(
                    r#"{"minecraft:block": {"description": {"identifier": "demo:sapphire_ore"}}}"#,
                )),
            )
            .unwrap();
        project.ensure_info_set_generated().await.unwrap();
        assert!(project.content_index().iteration() > iteration);
        let blocks = project.content_index().get_all(&[ReferenceCategory::BlockType]);
        assert!(blocks.values.contains_key("demo:sapphire_ore"));
        assert!(!blocks.values.contains_key("demo:ruby_ore"));
    }
}
