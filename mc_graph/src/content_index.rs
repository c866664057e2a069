use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;
use mc_model::ReferenceCategory;
use serde::Serialize;

/// "The item at `item_path` defines this key as a `category`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedValue {
    pub item_path: String,
    pub category: ReferenceCategory,
}

/// A consistent read of the index: every value was observed at `iteration`.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    pub iteration: u64,
    pub values: IndexMap<String, Vec<AnnotatedValue>>,
}

#[derive(Debug, Default)]
struct IndexState {
    iteration: u64,
    entries: IndexMap<String, Vec<AnnotatedValue>>,
}

/// Versioned store of categorized keys found in project content.
///
/// `iteration` strictly increases on every change to the annotated set, so two
/// reads with the same iteration saw the same index.
#[derive(Debug, Default)]
pub struct ContentIndex {
    state: RwLock<IndexState>,
}

impl ContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iteration(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iteration
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record that `item_path` defines `key` in `category`. Returns whether
    /// the index changed; repeating an existing annotation is a no-op.
    pub fn annotate(&self, category: ReferenceCategory, key: &str, item_path: &str) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let value = AnnotatedValue {
            item_path: item_path.to_string(),
            category,
        };

        let values = state.entries.entry(key.to_string()).or_default();
        if values.contains(&value) {
            return false;
        }
        values.push(value);
        state.iteration += 1;
        true
    }

    /// Every key with at least one value in `categories`, and only those values.
    pub fn get_all(&self, categories: &[ReferenceCategory]) -> IndexSnapshot {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let values = state
            .entries
            .iter()
            .filter_map(|(key, values)| {
                let matching: Vec<AnnotatedValue> = values
                    .iter()
                    .filter(|value| categories.contains(&value.category))
                    .cloned()
                    .collect();
                (!matching.is_empty()).then(|| (key.clone(), matching))
            })
            .collect();

        IndexSnapshot {
            iteration: state.iteration,
            values,
        }
    }

    /// Drop every annotation contributed by `item_path`.
    pub fn remove_item(&self, item_path: &str) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let before: usize = state.entries.values().map(Vec::len).sum();

        for values in state.entries.values_mut() {
            values.retain(|value| !value.item_path.eq_ignore_ascii_case(item_path));
        }
        state.entries.retain(|_, values| !values.is_empty());

        let after: usize = state.entries.values().map(Vec::len).sum();
        let changed = after != before;
        if changed {
            state.iteration += 1;
        }
        changed
    }

    /// Replace the whole index with `entries` of (category, key, item path).
    pub fn rebuild<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (ReferenceCategory, String, String)>,
    {
        let mut rebuilt: IndexMap<String, Vec<AnnotatedValue>> = IndexMap::new();
        for (category, key, item_path) in entries {
            let value = AnnotatedValue {
                item_path,
                category,
            };
            let values = rebuilt.entry(key).or_default();
            if !values.contains(&value) {
                values.push(value);
            }
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.entries = rebuilt;
        state.iteration += 1;
    }

    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.entries.clear();
        state.iteration += 1;
    }
}
