use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use dcp_crypto::ContentHasher;
use dcp_types::ContentHash;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::ContentRepository;

const CONTENT_FILE: &str = "content";

/// Filesystem-backed content repository.
///
/// Content lives at `<root>/<first two hex chars>/<remaining hex>/content`.
/// Writes stream into a temp file under the root while hashing, then the
/// temp file is atomically renamed into place. Reads re-verify the hash.
#[derive(Debug)]
pub struct FsContentRepository {
    root: PathBuf,
    read_only: bool,
}

impl FsContentRepository {
    /// Open (creating if needed) a writable repository rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            read_only: false,
        })
    }

    /// Open an existing repository that rejects writes and removals.
    pub fn open_read_only(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            read_only: true,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the content file for `hash`.
    pub fn content_path(&self, hash: &ContentHash) -> PathBuf {
        let hex = hash.to_hex();
        self.root.join(&hex[..2]).join(&hex[2..]).join(CONTENT_FILE)
    }
}

impl ContentRepository for FsContentRepository {
    fn add_content(&self, stream: &mut dyn Read) -> StoreResult<ContentHash> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        let (hash, size) = ContentHasher::CONTENT.copy_hashed(stream, tmp.as_file_mut())?;

        let path = self.content_path(&hash);
        if path.exists() {
            debug!(hash = %hash.short_hex(), "content already present");
            return Ok(hash);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        debug!(hash = %hash.short_hex(), size, path = %path.display(), "stored content");
        Ok(hash)
    }

    fn has_content(&self, hash: &ContentHash) -> StoreResult<bool> {
        Ok(self.content_path(hash).is_file())
    }

    fn read_content(&self, hash: &ContentHash) -> StoreResult<Option<Vec<u8>>> {
        let data = match fs::read(self.content_path(hash)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if !ContentHasher::CONTENT.verify(&data, hash) {
            return Err(StoreError::CorruptContent {
                hash: *hash,
                reason: format!("stored {} bytes hash to a different key", data.len()),
            });
        }
        Ok(Some(data))
    }

    fn remove_content(&self, hash: &ContentHash) -> StoreResult<bool> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        let path = self.content_path(hash);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }
        // Prune the now-empty fan-out directories; siblings keep them alive.
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir(dir);
            if let Some(fan_out) = dir.parent() {
                let _ = fs::remove_dir(fan_out);
            }
        }
        Ok(true)
    }
}
