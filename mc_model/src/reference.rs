use serde::Serialize;

use crate::{Canonicalizer, ItemKind};

/// How a reference is compared against candidate items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchScope {
    /// Exact match against the candidate's logical identifier.
    Identifier,
    /// Match against the candidate's canonical path below the shared pack root.
    PackPath,
}

/// A reference extracted from a definition, ready for matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalRef {
    /// The comparable form: canonical path key or verbatim identifier.
    pub key: String,
    /// What the definition actually said, for diagnostics.
    pub original: String,
    /// Kind of item expected to satisfy the reference; `None` accepts any.
    pub target: Option<ItemKind>,
    pub scope: MatchScope,
}

impl CanonicalRef {
    /// A logical ID reference. IDs are matched verbatim, never path-canonicalized.
    pub fn identifier(original: &str, target: ItemKind) -> Self {
        let original = original.trim().to_string();
        Self {
            key: original.clone(),
            original,
            target: Some(target),
            scope: MatchScope::Identifier,
        }
    }

    /// A path reference relative to the pack root.
    pub fn pack_path(canonicalizer: &Canonicalizer, original: &str, target: ItemKind) -> Self {
        let original = original.trim().to_string();
        Self {
            key: canonicalizer.canonicalize(&original),
            original,
            target: Some(target),
            scope: MatchScope::PackPath,
        }
    }

    pub fn expects(&self, kind: ItemKind) -> bool {
        self.target.is_none_or(|target| target == kind)
    }

    pub fn is_path(&self) -> bool {
        matches!(self.scope, MatchScope::PackPath)
    }
}

/// Drop references that compare equal to an earlier one. A definition that
/// names the same texture twice depends on it once.
pub fn dedup_refs(references: Vec<CanonicalRef>) -> Vec<CanonicalRef> {
    let mut unique: Vec<CanonicalRef> = Vec::with_capacity(references.len());
    for reference in references {
        let duplicate = unique.iter().any(|existing| {
            existing.key == reference.key
                && existing.scope == reference.scope
                && existing.target == reference.target
        });
        if !duplicate && !reference.key.is_empty() {
            unique.push(reference);
        }
    }
    unique
}
