//! Path canonicalization for content references.
//!
//! References inside definitions are written inconsistently: mixed casing,
//! with or without a file extension, sometimes with backslashes. Both sides of
//! a comparison go through [`Canonicalizer::canonicalize`] so they meet on one
//! comparable key.

use lazy_static::lazy_static;

/// Extensions stripped from the end of a path when canonicalizing.
pub const DEFAULT_CANONICAL_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "tga", "ogg", "wav", "fsb"];

lazy_static! {
    static ref DEFAULT_CANONICALIZER: Canonicalizer = Canonicalizer::default();
}

/// Canonicalize with the default extension allow-list.
pub fn canonicalize(path: &str) -> String {
    DEFAULT_CANONICALIZER.canonicalize(path)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonicalizer {
    extensions: Vec<String>,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CANONICAL_EXTENSIONS.iter().copied())
    }
}

impl Canonicalizer {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Lower-case the path, normalize separators and strip every trailing
    /// allow-listed extension. Never fails; unknown shapes round-trip.
    pub fn canonicalize(&self, path: &str) -> String {
        let mut canonical = path.replace('\\', "/").to_lowercase();

        // Strip repeatedly so "a.png.png" and "a" land on the same key.
        while let Some(dot) = canonical.rfind('.') {
            let extension = &canonical[dot + 1..];
            if extension.contains('/') || dot == 0 || canonical[..dot].ends_with('/') {
                break;
            }
            if !self.extensions.iter().any(|allowed| allowed == extension) {
                break;
            }
            canonical.truncate(dot);
        }

        canonical
    }

}

/// The part of `path` below `root`, comparing case-insensitively.
/// An empty root is the project root and contains everything.
pub fn relative_to<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return Some(path.trim_start_matches('/'));
    }

    let head = path.get(..root.len())?;
    if !head.eq_ignore_ascii_case(root) {
        return None;
    }
    path[root.len()..].strip_prefix('/')
}

/// Parent folder of a project path. Top-level files live in the root (`""`).
pub fn parent_folder(path: &str) -> Option<&str> {
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        return None;
    }
    match path.rsplit_once('/') {
        Some((parent, _)) => Some(parent),
        None => Some(""),
    }
}

/// Final segment of a path.
pub fn folder_name(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Iterate the ancestor folders of `path`, nearest first, ending at the root.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(parent_folder(path), |folder| parent_folder(folder))
}
