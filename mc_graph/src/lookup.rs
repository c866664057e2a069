use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use mc_model::{ReferenceCategory, SimpleReference, dedup_references, sort_references};
use mc_vanilla::VanillaCatalog;

use crate::project::Project;
use crate::settings::Settings;
use crate::GraphError;

/// Per-project reference lists, valid for one content index iteration.
#[derive(Debug, Default)]
pub struct LookupCache {
    last_seen_iteration: Option<u64>,
    lists: HashMap<ReferenceCategory, Arc<Vec<SimpleReference>>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached category if the index moved on since the last look.
    fn sync(&mut self, iteration: u64) {
        if self.last_seen_iteration == Some(iteration) {
            return;
        }
        if !self.lists.is_empty() {
            tracing::debug!(
                "content index moved to iteration {}, dropping {} cached lists",
                iteration,
                self.lists.len()
            );
        }
        self.lists.clear();
        self.last_seen_iteration = Some(iteration);
    }

    fn get(&self, category: ReferenceCategory) -> Option<Arc<Vec<SimpleReference>>> {
        self.lists.get(&category).cloned()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// Merges project-defined references with the built-in catalog.
#[derive(Debug, Clone)]
pub struct ReferenceLookup {
    catalog: Option<Arc<VanillaCatalog>>,
}

impl ReferenceLookup {
    pub fn new(catalog: Arc<VanillaCatalog>) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.catalog())
    }

    /// Project references only.
    pub fn without_vanilla() -> Self {
        Self { catalog: None }
    }

    /// Look up a category by name, as editors spell it. Unknown names are `None`.
    pub async fn get_lookup(
        &self,
        project: &Project,
        category: &str,
    ) -> Result<Option<Arc<Vec<SimpleReference>>>, GraphError> {
        match ReferenceCategory::from_name(category) {
            Some(category) => self.get_references(project, category).await.map(Some),
            None => {
                tracing::debug!("unknown lookup category {:?}", category);
                Ok(None)
            }
        }
    }

    /// The sorted reference list for `category`. Repeated calls on an
    /// unchanged project return the same list instance.
    pub async fn get_references(
        &self,
        project: &Project,
        category: ReferenceCategory,
    ) -> Result<Arc<Vec<SimpleReference>>, GraphError> {
        let mut cache = project.lookup_cache().lock().await;
        // Regeneration after an item edit moves the iteration, which the
        // check below then observes.
        project.ensure_info_set_generated().await?;
        cache.sync(project.content_index().iteration());
        if let Some(list) = cache.get(category) {
            return Ok(list);
        }

        let snapshot = project.content_index().get_all(&[category]);
        cache.sync(snapshot.iteration);

        let mut references: Vec<SimpleReference> = snapshot
            .values
            .iter()
            .flat_map(|(key, values)| {
                values.iter().map(move |value| {
                    SimpleReference::new(key.as_str())
                        .with_description(category.project_description(&value.item_path))
                })
            })
            .collect();
        dedup_references(&mut references);
        sort_references(&mut references);

        let mut complete = true;
        if let Some(catalog) = &self.catalog {
            match catalog.references(category).await {
                Ok(vanilla) => {
                    let defined: HashSet<String> =
                        references.iter().map(|reference| reference.id.clone()).collect();
                    references.extend(
                        vanilla
                            .iter()
                            .filter(|reference| !defined.contains(&reference.id))
                            .cloned(),
                    );
                }
                Err(e) => {
                    tracing::warn!("no built-in {} references: {}", category, e);
                    complete = false;
                }
            }
        }

        let list = Arc::new(references);
        // A partial list is served but not kept, so the catalog is retried.
        if complete && project.content_index().iteration() == snapshot.iteration {
            cache.lists.insert(category, list.clone());
        }
        Ok(list)
    }
}
