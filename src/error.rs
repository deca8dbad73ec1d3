use thiserror::Error;

/// Errors surfaced by segmentation, index building and snapshot loading.
#[derive(Debug, Error)]
pub enum Error {
    /// The process-wide segmenter was used before `init_segmenter` completed.
    #[error("segmenter is not initialized")]
    NotReady,

    #[error("segmenter initialization failed: {0}")]
    Init(String),

    /// A pluggable word segmenter rejected its input. Not retried.
    #[error("segmentation failed: {0}")]
    Segmentation(String),

    /// The snapshot is structurally unusable; rebuild from the keyword source.
    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// The trie arena ran out of node ids.
    #[error("index capacity exceeded: {0}")]
    Capacity(String),

    #[error("keyword supplier failed: {0}")]
    Supplier(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an arbitrary supplier failure.
    pub fn supplier(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Supplier(err.into())
    }
}
