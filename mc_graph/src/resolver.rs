//! Turning a definition's references into graph edges.
//!
//! One pass handles one item: extract what it wants, scan a snapshot of the
//! project for candidates, consume each wanted reference at most once, and
//! record whatever is left as unfulfilled.

use std::sync::Arc;
use std::time::Instant;

use mc_model::reference::dedup_refs;
use mc_model::{CanonicalRef, Canonicalizer, MatchScope};
use mc_vanilla::VanillaCatalog;
use serde::Serialize;

use crate::item::{ProjectItemRef, UnfulfilledRelationship};
use crate::pack_root::PackRoot;
use crate::project::Project;
use crate::settings::Settings;
use crate::GraphError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionSummary {
    pub items: usize,
    pub resolved: usize,
    pub unfulfilled: usize,
}

#[derive(Debug, Clone)]
pub struct RelationshipResolver {
    /// `None` records every unresolved reference as not vanilla.
    catalog: Option<Arc<VanillaCatalog>>,
    canonicalizer: Canonicalizer,
}

impl RelationshipResolver {
    pub fn new(catalog: Arc<VanillaCatalog>) -> Self {
        Self {
            catalog: Some(catalog),
            canonicalizer: Canonicalizer::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            catalog: (!settings.skip_vanilla_classification).then(|| settings.catalog()),
            canonicalizer: settings.canonicalizer(),
        }
    }

    pub fn without_classification() -> Self {
        Self {
            catalog: None,
            canonicalizer: Canonicalizer::default(),
        }
    }

    pub fn with_canonicalizer(mut self, canonicalizer: Canonicalizer) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    /// Recompute `item`'s children against the project as it is now.
    pub async fn add_child_items(
        &self,
        project: &Project,
        item: &ProjectItemRef,
    ) -> Result<(), GraphError> {
        let snapshot = project.items_snapshot();
        self.add_child_items_with_snapshot(project, &snapshot, item)
            .await
    }

    /// Recompute `item`'s children against `snapshot`, replacing the previous
    /// result wholesale. Only the item's own storage failure is an error;
    /// candidates that fail to load are skipped.
    pub async fn add_child_items_with_snapshot(
        &self,
        project: &Project,
        snapshot: &[ProjectItemRef],
        item: &ProjectItemRef,
    ) -> Result<(), GraphError> {
        let storage = project.storage()?;
        item.ensure_loaded(storage.as_ref()).await?;

        let Some(definition) = item.definition() else {
            item.replace_relations(Vec::new(), Vec::new());
            return Ok(());
        };
        let wanted = dedup_refs(definition.referenced_paths(&self.canonicalizer));

        let pack_root = if wanted.iter().any(CanonicalRef::is_path) {
            let root = project.locate_pack_root(item);
            if root.is_none() {
                tracing::debug!("no pack root for {}, path references stay unresolved", item.path);
            }
            root
        } else {
            None
        };

        let mut slots: Vec<Option<CanonicalRef>> = wanted.into_iter().map(Some).collect();
        let mut children = Vec::new();

        for candidate in snapshot {
            if Arc::ptr_eq(candidate, item) {
                continue;
            }
            let open = |by_identifier: bool| {
                slots.iter().flatten().any(|reference| {
                    reference.expects(candidate.kind) && reference.is_path() != by_identifier
                })
            };
            let wants_identifier = open(true);
            let wants_path = open(false);
            if !wants_identifier && !wants_path {
                continue;
            }

            let identifier = if wants_identifier {
                match candidate.ensure_loaded(storage.as_ref()).await {
                    Ok(()) => candidate.identifier(),
                    Err(e) => {
                        tracing::warn!("skipping candidate {}: {:#}", candidate.path, e);
                        continue;
                    }
                }
            } else {
                None
            };
            let relative = pack_root
                .as_ref()
                .and_then(|root: &PackRoot| root.relative(&candidate.path));

            let matched = slots.iter_mut().find(|slot| match slot {
                Some(reference) if reference.expects(candidate.kind) => match reference.scope {
                    MatchScope::Identifier => identifier.as_deref() == Some(reference.key.as_str()),
                    MatchScope::PackPath => relative
                        .map(|relative| self.canonicalizer.canonicalize(relative))
                        .is_some_and(|key| key == reference.key),
                },
                _ => false,
            });

            if let Some(slot) = matched {
                *slot = None;
                children.push(candidate.clone());
            }
        }

        let mut unfulfilled = Vec::new();
        for reference in slots.into_iter().flatten() {
            let is_vanilla_token = self.classify(&reference).await;
            unfulfilled.push(UnfulfilledRelationship {
                identifier: reference.original,
                expected_kind: reference.target,
                is_vanilla_token,
            });
        }

        tracing::debug!(
            "{}: {} children, {} unfulfilled",
            item.path,
            children.len(),
            unfulfilled.len()
        );
        item.replace_relations(children, unfulfilled);
        Ok(())
    }

    async fn classify(&self, reference: &CanonicalRef) -> bool {
        let Some(catalog) = &self.catalog else {
            return false;
        };
        match catalog.is_vanilla_token(reference).await {
            Ok(known) => known,
            Err(e) => {
                tracing::warn!("vanilla catalog unavailable: {}", e);
                false
            }
        }
    }

    /// Resolve every definition-backed item against one snapshot.
    pub async fn resolve_all(&self, project: &Project) -> Result<ResolutionSummary, GraphError> {
        let start = Instant::now();
        let snapshot = project.items_snapshot();
        let mut summary = ResolutionSummary::default();

        for item in snapshot.iter().filter(|item| item.kind.is_json()) {
            self.add_child_items_with_snapshot(project, &snapshot, item)
                .await?;
            summary.items += 1;
            summary.resolved += item.child_items().len();
            summary.unfulfilled += item.unfulfilled_relationships().len();
        }

        tracing::info!(
            "resolved {} items in {:?}: {} edges, {} unfulfilled",
            summary.items,
            start.elapsed(),
            summary.resolved,
            summary.unfulfilled
        );
        Ok(summary)
    }
}
