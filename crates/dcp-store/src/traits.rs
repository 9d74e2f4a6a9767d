use std::io::Read;

use dcp_types::ContentHash;

use crate::error::StoreResult;

/// Content-addressed repository for deployment content.
///
/// All implementations must satisfy these invariants:
/// - Equal content always yields an equal hash; storing it twice is a no-op.
/// - `add_content` drains the stream fully and accepts zero-length streams.
/// - The repository never interprets content — it is a pure key-value store.
/// - All I/O errors are propagated, never silently ignored.
pub trait ContentRepository: Send + Sync {
    /// Consume `stream` to its end, store the bytes, and return their hash.
    fn add_content(&self, stream: &mut dyn Read) -> StoreResult<ContentHash>;

    /// Check whether content with this hash is stored.
    fn has_content(&self, hash: &ContentHash) -> StoreResult<bool>;

    /// Read stored content by hash.
    ///
    /// Returns `Ok(None)` if nothing is stored under the hash.
    fn read_content(&self, hash: &ContentHash) -> StoreResult<Option<Vec<u8>>>;

    /// Remove content by hash. Returns `true` if it existed.
    ///
    /// Intended for garbage collection only. Removing content that a stored
    /// operation still references breaks that operation.
    fn remove_content(&self, hash: &ContentHash) -> StoreResult<bool>;
}
