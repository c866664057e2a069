//! The storage collaborator: how item bytes are fetched is not this crate's
//! concern, only that they can be asked for by project path.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use anyhow::Context;
use futures::future::{BoxFuture, FutureExt};

use crate::LowerCaseHashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Bytes(Vec<u8>),
}

impl Content {
    /// Decode bytes as UTF-8 text where possible
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Content::Text(text),
            Err(e) => Content::Bytes(e.into_bytes()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Content::Text(text) => text.len(),
            Content::Bytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

/// Loads item content by project-relative path.
///
/// `Ok(None)` means the content is absent, which callers treat as a soft miss.
/// `Err` is reserved for genuine storage failures such as permission errors.
pub trait ContentSource: Send + Sync {
    fn load_content<'a>(&'a self, path: &'a str) -> BoxFuture<'a, anyhow::Result<Option<Content>>>;
}

/// Content held in memory, keyed case-insensitively by project path.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<LowerCaseHashMap<Content>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, content: impl Into<Content>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, content.into());
    }

    pub fn remove(&self, path: &str) -> Option<Content> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P: AsRef<str>, C: Into<Content>> FromIterator<(P, C)> for MemorySource {
    fn from_iter<T: IntoIterator<Item = (P, C)>>(iter: T) -> Self {
        let source = MemorySource::new();
        for (path, content) in iter {
            source.insert(path.as_ref(), content);
        }
        source
    }
}

impl ContentSource for MemorySource {
    fn load_content<'a>(&'a self, path: &'a str) -> BoxFuture<'a, anyhow::Result<Option<Content>>> {
        let content = self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned();
        futures::future::ready(Ok(content)).boxed()
    }
}

/// Content read from a folder on disk. Project paths are relative to `root`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split(['/', '\\'])
            .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
            .fold(self.root.clone(), |full, segment| full.join(segment))
    }
}

impl ContentSource for DirectorySource {
    fn load_content<'a>(&'a self, path: &'a str) -> BoxFuture<'a, anyhow::Result<Option<Content>>> {
        async move {
            let full_path = self.resolve(path);
            match tokio::fs::read(&full_path).await {
                Ok(bytes) => Ok(Some(Content::from_bytes(bytes))),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e)
                    .with_context(|| format!("Failed to read {}", full_path.display())),
            }
        }
        .boxed()
    }
}
