use dcp_types::ContentHash;

/// Errors from content repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error while reading the source stream or the backing storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes no longer hash to their key (data corruption).
    #[error("corrupt content {hash}: {reason}")]
    CorruptContent { hash: ContentHash, reason: String },

    /// Repository is read-only.
    #[error("repository is read-only")]
    ReadOnly,
}

/// Result alias for repository operations.
pub type StoreResult<T> = Result<T, StoreError>;
