//! Content dependency resolution for Bedrock resource and behavior packs.
//!
//! The heavy lifting lives in the workspace crates; this crate wires them to a
//! folder on disk and renders what the resolver found.

pub mod report;
pub mod scan;

pub use mc_graph::{
    ContentIndex, GraphError, Project, ProjectItem, ProjectItemRef, ReferenceLookup,
    RelationshipResolver, ResolutionSummary, Settings, UnfulfilledRelationship,
};
pub use mc_model::{Canonicalizer, Definition, ItemKind, ReferenceCategory, SimpleReference};
pub use mc_vanilla::{CatalogError, VanillaCatalog, VanillaSource};

pub use report::{ItemReport, ProjectReport, build_report};
pub use scan::load_project;
