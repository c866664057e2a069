pub mod canonical;
pub mod category;
pub mod definitions;
pub mod json;
pub mod kind;
pub mod lowercase_hashmap;
pub mod reference;
pub mod storage;

pub use canonical::{Canonicalizer, canonicalize};
pub use category::{
    ReferenceCategory, SimpleReference, dedup_references, humanize_identifier, sort_references,
};
pub use definitions::Definition;
pub use json::parse_json;
pub use kind::{ItemKind, PackAnchor};
pub use lowercase_hashmap::LowerCaseHashMap;
pub use reference::{CanonicalRef, MatchScope};
pub use storage::{Content, ContentSource, DirectorySource, MemorySource};
