use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use mc_model::{Content, ContentSource, Definition, ItemKind, parse_json};
use serde::Serialize;

use crate::GraphError;

pub type ProjectItemRef = Arc<ProjectItem>;

/// A reference the last resolution pass could not match to any project item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfulfilledRelationship {
    /// The reference as the definition wrote it.
    pub identifier: String,
    pub expected_kind: Option<ItemKind>,
    /// Whether the engine ships something by this name, in which case nothing is broken.
    pub is_vanilla_token: bool,
}

#[derive(Default)]
struct ItemContent {
    loaded: bool,
    content: Option<Content>,
    definition: Option<Arc<Definition>>,
}

#[derive(Default)]
struct Relations {
    children: Vec<ProjectItemRef>,
    unfulfilled: Vec<UnfulfilledRelationship>,
}

/// One file-backed content artifact and its place in the dependency graph.
///
/// Children are held strongly and parents weakly; the owning project breaks
/// any remaining child cycles when it is dropped.
pub struct ProjectItem {
    pub kind: ItemKind,
    pub path: String,
    content: RwLock<ItemContent>,
    relations: RwLock<Relations>,
    parents: RwLock<Vec<Weak<ProjectItem>>>,
}

impl fmt::Debug for ProjectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectItem")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .finish()
    }
}

impl ProjectItem {
    pub fn new(kind: ItemKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            content: RwLock::new(ItemContent::default()),
            relations: RwLock::new(Relations::default()),
            parents: RwLock::new(Vec::new()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.content
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loaded
    }

    /// Load content from storage once. Absent content leaves the item loaded
    /// with no definition; only genuine storage failures are errors.
    pub async fn ensure_loaded(&self, storage: &dyn ContentSource) -> Result<(), GraphError> {
        if self.is_loaded() {
            return Ok(());
        }

        let content = storage
            .load_content(&self.path)
            .await
            .map_err(|e| GraphError::storage(&self.path, e))?;
        if content.is_none() {
            tracing::debug!("no content for {}", self.path);
        }

        let mut state = self.content.write().unwrap_or_else(PoisonError::into_inner);
        if !state.loaded {
            self.apply_content(&mut state, content);
        }
        Ok(())
    }

    /// Replace the item's content, dropping the cached definition.
    pub fn set_content(&self, content: Option<Content>) {
        let mut state = self.content.write().unwrap_or_else(PoisonError::into_inner);
        self.apply_content(&mut state, content);
    }

    fn apply_content(&self, state: &mut ItemContent, content: Option<Content>) {
        state.definition = if self.kind.is_json() {
            content
                .as_ref()
                .and_then(parse_json)
                .and_then(|value| Definition::parse(self.kind, &value))
                .map(Arc::new)
        } else {
            None
        };
        state.content = content;
        state.loaded = true;
    }

    pub fn content(&self) -> Option<Content> {
        self.content
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .content
            .clone()
    }

    /// The parsed wrapper, if the item is loaded and its body is a readable definition.
    pub fn definition(&self) -> Option<Arc<Definition>> {
        self.content
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .definition
            .clone()
    }

    pub fn identifier(&self) -> Option<String> {
        self.definition()
            .and_then(|definition| definition.identifier().map(str::to_string))
    }

    pub fn child_items(&self) -> Vec<ProjectItemRef> {
        self.relations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .children
            .clone()
    }

    pub fn parent_items(&self) -> Vec<ProjectItemRef> {
        self.parents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    pub fn unfulfilled_relationships(&self) -> Vec<UnfulfilledRelationship> {
        self.relations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .unfulfilled
            .clone()
    }

    /// Install the result of a resolution pass, replacing the previous one
    /// wholesale and keeping the children's parent links in step.
    pub fn replace_relations(
        self: &Arc<Self>,
        children: Vec<ProjectItemRef>,
        unfulfilled: Vec<UnfulfilledRelationship>,
    ) {
        let previous = {
            let mut relations = self.relations.write().unwrap_or_else(PoisonError::into_inner);
            relations.unfulfilled = unfulfilled;
            std::mem::replace(&mut relations.children, children.clone())
        };

        for child in &previous {
            child.remove_parent(self);
        }
        for child in &children {
            child.add_parent(self);
        }
    }

    /// Drop every edge touching this item, in both directions.
    pub fn detach(self: &Arc<Self>) {
        self.replace_relations(Vec::new(), Vec::new());

        let parents =
            std::mem::take(&mut *self.parents.write().unwrap_or_else(PoisonError::into_inner));
        for parent in parents.iter().filter_map(Weak::upgrade) {
            parent
                .relations
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .children
                .retain(|child| !Arc::ptr_eq(child, self));
        }
    }

    pub(crate) fn clear_children(&self) {
        let mut relations = self.relations.write().unwrap_or_else(PoisonError::into_inner);
        relations.children.clear();
        relations.unfulfilled.clear();
    }

    fn add_parent(&self, parent: &Arc<ProjectItem>) {
        let mut parents = self.parents.write().unwrap_or_else(PoisonError::into_inner);
        parents.retain(|existing| existing.strong_count() > 0);
        if !parents.iter().any(|existing| existing.as_ptr() == Arc::as_ptr(parent)) {
            parents.push(Arc::downgrade(parent));
        }
    }

    fn remove_parent(&self, parent: &Arc<ProjectItem>) {
        self.parents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|existing| existing.as_ptr() != Arc::as_ptr(parent));
    }
}
