//! Finding the folder that relative references inside a file are written against.

use std::sync::{PoisonError, RwLock};

use mc_model::PackAnchor;
use mc_model::canonical::{ancestors, folder_name, parent_folder, relative_to};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackRoot {
    path: String,
}

impl PackRoot {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into().replace('\\', "/");
        Self {
            path: path.trim_end_matches('/').to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `item_path` relative to this root, or `None` when the item lives elsewhere.
    pub fn relative<'a>(&self, item_path: &'a str) -> Option<&'a str> {
        relative_to(item_path, &self.path)
    }

    fn contains(&self, item_path: &str) -> bool {
        self.relative(item_path).is_some()
    }
}

/// Pack roots declared by manifests.
#[derive(Debug, Default)]
pub struct PackRegistry {
    roots: RwLock<Vec<PackRoot>>,
}

impl PackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the folder holding `manifest_path` as a pack root.
    pub fn register_manifest(&self, manifest_path: &str) {
        if let Some(folder) = parent_folder(manifest_path) {
            self.register(PackRoot::new(folder));
        }
    }

    pub fn unregister_manifest(&self, manifest_path: &str) {
        if let Some(folder) = parent_folder(manifest_path) {
            let root = PackRoot::new(folder);
            self.roots
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|existing| !existing.path.eq_ignore_ascii_case(&root.path));
        }
    }

    pub fn register(&self, root: PackRoot) {
        let mut roots = self.roots.write().unwrap_or_else(PoisonError::into_inner);
        if !roots
            .iter()
            .any(|existing| existing.path.eq_ignore_ascii_case(&root.path))
        {
            tracing::debug!("registered pack root {:?}", root.path);
            roots.push(root);
        }
    }

    pub fn roots(&self) -> Vec<PackRoot> {
        self.roots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The deepest registered pack holding `item_path`.
    pub fn containing(&self, item_path: &str) -> Option<PackRoot> {
        self.roots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|root| root.contains(item_path))
            .max_by_key(|root| root.path.len())
            .cloned()
    }
}

/// Locate the pack root for a file at `item_path`.
///
/// A registered pack wins. Otherwise a `Folder` anchor finds the nearest
/// ancestor folder with that name and answers its parent, and a
/// `ContainingFolder` anchor answers the folder holding the file. `None` is
/// a benign miss: the caller skips path resolution for the item.
pub fn locate_pack_root(
    item_path: &str,
    anchor: PackAnchor,
    registry: &PackRegistry,
) -> Option<PackRoot> {
    let item_path = item_path.replace('\\', "/");
    if anchor == PackAnchor::None {
        return None;
    }
    if let Some(root) = registry.containing(&item_path) {
        return Some(root);
    }

    match anchor {
        PackAnchor::Folder(name) => ancestors(&item_path)
            .find(|folder| !folder.is_empty() && folder_name(folder).eq_ignore_ascii_case(name))
            .and_then(parent_folder)
            .map(PackRoot::new),
        PackAnchor::ContainingFolder => parent_folder(&item_path).map(PackRoot::new),
        PackAnchor::None => None,
    }
}
