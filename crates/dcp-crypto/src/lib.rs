//! Content hashing for the deployment content pipeline.
//!
//! Provides domain-separated BLAKE3 hashing, both one-shot and incremental,
//! and a tee copy so repositories can hash content while streaming it to
//! storage.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod hasher;

pub use hasher::{ContentHasher, DomainHasher};
