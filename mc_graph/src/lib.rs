pub mod content_index;
mod error;
pub mod item;
pub mod lookup;
pub mod pack_root;
pub mod project;
pub mod resolver;
pub mod settings;

#[cfg(test)]
mod tests;

pub use content_index::{AnnotatedValue, ContentIndex, IndexSnapshot};
pub use error::GraphError;
pub use item::{ProjectItem, ProjectItemRef, UnfulfilledRelationship};
pub use lookup::{LookupCache, ReferenceLookup};
pub use pack_root::{PackRegistry, PackRoot, locate_pack_root};
pub use project::Project;
pub use resolver::{RelationshipResolver, ResolutionSummary};
pub use settings::Settings;
