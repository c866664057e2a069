//! Jigsaw worldgen definitions: structures, template pools, processor lists
//! and structure sets. They reference each other by logical identifier.

use serde::Deserialize;
use serde_json::Value;

use super::{lenient, non_empty};
use crate::{CanonicalRef, Canonicalizer, ItemKind};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct Description {
    identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct JigsawStructureDefinition {
    #[serde(rename = "minecraft:jigsaw")]
    jigsaw: JigsawStructure,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct JigsawStructure {
    description: Description,
    step: Option<String>,
    start_pool: Option<String>,
    max_depth: Option<u32>,
}

impl JigsawStructureDefinition {
    pub fn from_json(value: &Value) -> Self {
        lenient(value, "jigsaw structure")
    }

    pub fn identifier(&self) -> Option<&str> {
        non_empty(&self.jigsaw.description.identifier)
    }

    pub fn start_pool(&self) -> Option<&str> {
        non_empty(&self.jigsaw.start_pool)
    }

    pub fn step(&self) -> Option<&str> {
        non_empty(&self.jigsaw.step)
    }

    pub fn max_depth(&self) -> Option<u32> {
        self.jigsaw.max_depth
    }

    pub fn referenced_paths(&self) -> Vec<CanonicalRef> {
        self.start_pool()
            .map(|pool| CanonicalRef::identifier(pool, ItemKind::JigsawTemplatePool))
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemplatePoolDefinition {
    #[serde(rename = "minecraft:template_pool")]
    pool: TemplatePool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct TemplatePool {
    description: Description,
    elements: Vec<PoolEntry>,
    fallback: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct PoolEntry {
    weight: Option<u32>,
    element: PoolElement,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct PoolElement {
    location: Option<String>,
    // Either a processor list identifier or an inline list; only the former is a reference.
    processors: Option<Value>,
}

impl TemplatePoolDefinition {
    pub fn from_json(value: &Value) -> Self {
        lenient(value, "template pool")
    }

    pub fn identifier(&self) -> Option<&str> {
        non_empty(&self.pool.description.identifier)
    }

    pub fn fallback(&self) -> Option<&str> {
        non_empty(&self.pool.fallback)
    }

    /// Sum of element weights; elements without a weight count once.
    pub fn total_weight(&self) -> u32 {
        self.pool
            .elements
            .iter()
            .map(|entry| entry.weight.unwrap_or(1))
            .sum()
    }

    pub fn structure_locations(&self) -> impl Iterator<Item = &str> {
        self.pool
            .elements
            .iter()
            .filter_map(|entry| non_empty(&entry.element.location))
    }

    pub fn processor_list_ids(&self) -> impl Iterator<Item = &str> {
        self.pool.elements.iter().filter_map(|entry| {
            entry
                .element
                .processors
                .as_ref()
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|id| !id.is_empty())
        })
    }

    pub fn referenced_paths(&self, canonicalizer: &Canonicalizer) -> Vec<CanonicalRef> {
        let mut references = Vec::new();
        for entry in &self.pool.elements {
            if let Some(location) = non_empty(&entry.element.location) {
                references.push(CanonicalRef::pack_path(
                    canonicalizer,
                    &format!("{location}.mcstructure"),
                    ItemKind::Structure,
                ));
            }
            if let Some(processors) = entry.element.processors.as_ref().and_then(Value::as_str) {
                if !processors.trim().is_empty() {
                    references.push(CanonicalRef::identifier(
                        processors,
                        ItemKind::JigsawProcessorList,
                    ));
                }
            }
        }
        references
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProcessorListDefinition {
    #[serde(rename = "minecraft:processor_list")]
    list: ProcessorList,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct ProcessorList {
    description: Description,
    processors: Vec<Value>,
}

impl ProcessorListDefinition {
    pub fn from_json(value: &Value) -> Self {
        lenient(value, "processor list")
    }

    pub fn identifier(&self) -> Option<&str> {
        non_empty(&self.list.description.identifier)
    }

    pub fn processor_count(&self) -> usize {
        self.list.processors.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StructureSetDefinition {
    #[serde(rename = "minecraft:structure_set")]
    set: StructureSet,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct StructureSet {
    description: Description,
    structures: Vec<WeightedStructure>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct WeightedStructure {
    structure: Option<String>,
    weight: Option<u32>,
}

impl StructureSetDefinition {
    pub fn from_json(value: &Value) -> Self {
        lenient(value, "structure set")
    }

    pub fn identifier(&self) -> Option<&str> {
        non_empty(&self.set.description.identifier)
    }

    pub fn structure_ids(&self) -> impl Iterator<Item = &str> {
        self.set
            .structures
            .iter()
            .filter_map(|entry| non_empty(&entry.structure))
    }

    pub fn weighted_structures(&self) -> impl Iterator<Item = (&str, u32)> {
        self.set
            .structures
            .iter()
            .filter_map(|entry| Some((non_empty(&entry.structure)?, entry.weight.unwrap_or(1))))
    }

    pub fn referenced_paths(&self) -> Vec<CanonicalRef> {
        self.structure_ids()
            .map(|id| CanonicalRef::identifier(id, ItemKind::JigsawStructure))
            .collect()
    }
}
