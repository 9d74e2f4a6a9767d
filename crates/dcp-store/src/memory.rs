use std::collections::HashMap;
use std::io::Read;
use std::sync::RwLock;

use dcp_crypto::ContentHasher;
use dcp_types::ContentHash;

use crate::error::StoreResult;
use crate::traits::ContentRepository;

/// In-memory, HashMap-based content repository.
///
/// Intended for tests and embedding. Content is held behind a `RwLock` for
/// safe concurrent access and cloned on read.
pub struct InMemoryContentRepository {
    contents: RwLock<HashMap<ContentHash, Vec<u8>>>,
}

impl InMemoryContentRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self {
            contents: RwLock::new(HashMap::new()),
        }
    }

    /// Number of distinct contents stored.
    pub fn len(&self) -> usize {
        self.contents.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.contents.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryContentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRepository for InMemoryContentRepository {
    fn add_content(&self, stream: &mut dyn Read) -> StoreResult<ContentHash> {
        let mut data = Vec::new();
        let (hash, _) = ContentHasher::CONTENT.copy_hashed(stream, &mut data)?;
        let mut map = self.contents.write().expect("lock poisoned");
        // Idempotent: equal hash means equal content.
        map.entry(hash).or_insert(data);
        Ok(hash)
    }

    fn has_content(&self, hash: &ContentHash) -> StoreResult<bool> {
        let map = self.contents.read().expect("lock poisoned");
        Ok(map.contains_key(hash))
    }

    fn read_content(&self, hash: &ContentHash) -> StoreResult<Option<Vec<u8>>> {
        let map = self.contents.read().expect("lock poisoned");
        Ok(map.get(hash).cloned())
    }

    fn remove_content(&self, hash: &ContentHash) -> StoreResult<bool> {
        let mut map = self.contents.write().expect("lock poisoned");
        Ok(map.remove(hash).is_some())
    }
}

impl std::fmt::Debug for InMemoryContentRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContentRepository")
            .field("content_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(repo: &InMemoryContentRepository, data: &[u8]) -> ContentHash {
        let mut reader = data;
        repo.add_content(&mut reader).unwrap()
    }

    #[test]
    fn add_and_read() {
        let repo = InMemoryContentRepository::new();
        let hash = add(&repo, b"hello world");
        assert_eq!(repo.read_content(&hash).unwrap().as_deref(), Some(&b"hello world"[..]));
    }

    #[test]
    fn same_content_produces_same_hash() {
        let repo = InMemoryContentRepository::new();
        let h1 = add(&repo, b"identical content");
        let h2 = add(&repo, b"identical content");
        assert_eq!(h1, h2);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn different_content_produces_different_hashes() {
        let repo = InMemoryContentRepository::new();
        assert_ne!(add(&repo, b"aaa"), add(&repo, b"bbb"));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn empty_stream_is_stored() {
        let repo = InMemoryContentRepository::new();
        let hash = add(&repo, b"");
        assert_eq!(hash, ContentHasher::CONTENT.hash(b""));
        assert_eq!(repo.read_content(&hash).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn stream_is_drained() {
        let repo = InMemoryContentRepository::new();
        let data = b"drain me".to_vec();
        let mut cursor = std::io::Cursor::new(data);
        repo.add_content(&mut cursor).unwrap();
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn has_and_remove() {
        let repo = InMemoryContentRepository::new();
        let hash = add(&repo, b"to-delete");
        assert!(repo.has_content(&hash).unwrap());
        assert!(repo.remove_content(&hash).unwrap());
        assert!(!repo.has_content(&hash).unwrap());
        assert!(!repo.remove_content(&hash).unwrap());
    }

    #[test]
    fn read_missing_returns_none() {
        let repo = InMemoryContentRepository::new();
        let hash = ContentHasher::CONTENT.hash(b"missing");
        assert!(repo.read_content(&hash).unwrap().is_none());
    }

    #[test]
    fn concurrent_adds_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let repo = Arc::new(InMemoryContentRepository::new());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    let data = vec![i; 16];
                    let mut reader = &data[..];
                    repo.add_content(&mut reader).unwrap()
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(repo.len(), 8);
    }

    #[test]
    fn debug_format() {
        let repo = InMemoryContentRepository::new();
        add(&repo, b"x");
        let debug = format!("{repo:?}");
        assert!(debug.contains("InMemoryContentRepository"));
        assert!(debug.contains("content_count"));
    }
}
