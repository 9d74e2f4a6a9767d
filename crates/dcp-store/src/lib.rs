//! Content-addressed repository for deployment content.
//!
//! Deployment bytes are stored once, keyed by the [`ContentHash`] of their
//! contents, so replicated management operations only ever need to carry
//! the hash.
//!
//! # Backends
//!
//! All backends implement the [`ContentRepository`] trait:
//!
//! - [`InMemoryContentRepository`] -- `HashMap`-based store for tests and embedding
//! - [`FsContentRepository`] -- hash-fanned directory layout on local disk
//!
//! # Design Rules
//!
//! 1. Content is immutable once written (content-addressing guarantees this).
//! 2. Writing identical content twice is a no-op returning the same hash.
//! 3. Zero-length content is valid content.
//! 4. All I/O errors are propagated, never silently ignored.
//!
//! [`ContentHash`]: dcp_types::ContentHash

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsContentRepository;
pub use memory::InMemoryContentRepository;
pub use traits::ContentRepository;
