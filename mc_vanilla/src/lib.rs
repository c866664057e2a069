mod catalog;
mod error;

pub use catalog::{VanillaCatalog, VanillaSource};
pub use error::CatalogError;
