use std::fmt;

use crate::error::TypeError;

/// Content-addressed key returned by a content repository.
///
/// A `ContentHash` identifies one exact byte sequence held by a repository.
/// The pipeline never interprets it: it is carried in rewritten operations
/// and compared for equality, nothing more.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Length of a content hash in bytes.
    pub const LEN: usize = 32;

    /// Create a `ContentHash` from a pre-computed digest.
    pub const fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// Create a `ContentHash` from a byte slice of exactly [`Self::LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| TypeError::InvalidLength {
            expected: Self::LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for ContentHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<ContentHash> for [u8; 32] {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_accepts_exact_length() {
        let hash = ContentHash::from_slice(&[7u8; 32]).unwrap();
        assert_eq!(hash.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        let err = ContentHash::from_slice(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 3
            }
        );
    }

    #[test]
    fn hex_roundtrip() {
        let hash = ContentHash::from_hash([0xab; 32]);
        let parsed = ContentHash::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(
            ContentHash::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
        assert!(matches!(
            ContentHash::from_hex("abcd"),
            Err(TypeError::InvalidLength { actual: 2, .. })
        ));
    }

    #[test]
    fn short_hex_is_8_chars() {
        let hash = ContentHash::from_hash([0x12; 32]);
        assert_eq!(hash.short_hex(), "12121212");
    }

    #[test]
    fn display_is_full_hex() {
        let hash = ContentHash::from_hash([0; 32]);
        let display = format!("{hash}");
        assert_eq!(display.len(), 64);
        assert_eq!(display, hash.to_hex());
    }

    #[test]
    fn ordering_is_consistent() {
        let h1 = ContentHash::from_hash([0; 32]);
        let h2 = ContentHash::from_hash([1; 32]);
        assert!(h1 < h2);
    }
}
