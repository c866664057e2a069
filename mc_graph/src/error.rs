use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// Resolution was asked for before the project had anything to load from.
    #[error("project storage has not been initialized")]
    StorageNotInitialized,
    #[error("failed to load {path}")]
    Storage {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("no project item at {0}")]
    UnknownItem(String),
}

impl GraphError {
    pub(crate) fn storage(path: &str, source: anyhow::Error) -> Self {
        GraphError::Storage {
            path: path.to_string(),
            source: source.into(),
        }
    }
}
