use std::io::{self, Read, Write};

use dcp_types::ContentHash;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"dcp-content-v1"`) that is
/// prepended to every hash computation, so hashes from different domains
/// never collide even for identical bytes.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for deployment content.
    pub const CONTENT: Self = Self {
        domain: "dcp-content-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ContentHash {
        let mut hasher = self.hasher();
        hasher.update(data);
        hasher.finalize()
    }

    /// Start an incremental hash in this domain.
    pub fn hasher(&self) -> DomainHasher {
        let mut inner = blake3::Hasher::new();
        inner.update(self.domain.as_bytes());
        inner.update(b":");
        DomainHasher { inner }
    }

    /// Copy `reader` into `sink`, hashing every byte that reaches the sink.
    ///
    /// Returns the hash and the number of bytes copied.
    pub fn copy_hashed(
        &self,
        reader: &mut dyn Read,
        sink: &mut dyn Write,
    ) -> io::Result<(ContentHash, u64)> {
        let mut tee = HashingWriter {
            inner: sink,
            hasher: self.hasher(),
        };
        let size = io::copy(reader, &mut tee)?;
        tee.flush()?;
        Ok((tee.hasher.finalize(), size))
    }

    /// Verify that data produces the expected hash.
    pub fn verify(&self, data: &[u8], expected: &ContentHash) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Incremental hasher returned by [`ContentHasher::hasher`].
pub struct DomainHasher {
    inner: blake3::Hasher,
}

impl DomainHasher {
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    pub fn finalize(&self) -> ContentHash {
        ContentHash::from_hash(*self.inner.finalize().as_bytes())
    }
}

/// Writes through to `inner` while feeding every written byte to the hasher.
struct HashingWriter<'a> {
    inner: &'a mut dyn Write,
    hasher: DomainHasher,
}

impl Write for HashingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"hello world";
        assert_eq!(ContentHasher::CONTENT.hash(data), ContentHasher::CONTENT.hash(data));
    }

    #[test]
    fn different_domains_produce_different_hashes() {
        let custom = ContentHasher::new("my-custom-domain-v1");
        assert_ne!(custom.hash(b"data"), ContentHasher::CONTENT.hash(b"data"));
    }

    #[test]
    fn incremental_matches_one_shot() {
        let mut hasher = ContentHasher::CONTENT.hasher();
        hasher.update(b"hello ");
        hasher.update(b"world");
        assert_eq!(hasher.finalize(), ContentHasher::CONTENT.hash(b"hello world"));
    }

    #[test]
    fn copy_hashed_tees_into_the_sink() {
        let data = vec![0x5au8; 100_000];
        let mut sink = Vec::new();
        let (hash, size) = ContentHasher::CONTENT
            .copy_hashed(&mut &data[..], &mut sink)
            .unwrap();
        assert_eq!(hash, ContentHasher::CONTENT.hash(&data));
        assert_eq!(size, 100_000);
        assert_eq!(sink, data);
    }

    #[test]
    fn empty_input_has_a_hash() {
        let mut sink = Vec::new();
        let (hash, size) = ContentHasher::CONTENT
            .copy_hashed(&mut &b""[..], &mut sink)
            .unwrap();
        assert_eq!(hash, ContentHasher::CONTENT.hash(b""));
        assert_eq!(size, 0);
    }

    /// Sink that accepts at most three bytes per write.
    struct Trickle(Vec<u8>);

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(3);
            self.0.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn short_writes_hash_only_what_was_written() {
        let mut sink = Trickle(Vec::new());
        let (hash, _) = ContentHasher::CONTENT
            .copy_hashed(&mut &b"deployment bytes"[..], &mut sink)
            .unwrap();
        assert_eq!(sink.0, b"deployment bytes");
        assert_eq!(hash, ContentHasher::CONTENT.hash(b"deployment bytes"));
    }

    #[test]
    fn verify_detects_tampering() {
        let hash = ContentHasher::CONTENT.hash(b"original");
        assert!(ContentHasher::CONTENT.verify(b"original", &hash));
        assert!(!ContentHasher::CONTENT.verify(b"tampered", &hash));
    }

    #[test]
    fn domain_accessor() {
        assert_eq!(ContentHasher::CONTENT.domain(), "dcp-content-v1");
    }
}
