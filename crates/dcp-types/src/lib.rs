//! Foundation types for the deployment content pipeline (DCP).
//!
//! Every other DCP crate depends on `dcp-types`.
//!
//! # Key Types
//!
//! - [`ContentHash`] — Opaque content-addressed key returned by a repository
//! - [`ModelNode`] — Recursive, deep-cloneable management operation tree
//! - [`fields`] — Field names used by deployment operations

pub mod error;
pub mod fields;
pub mod hash;
pub mod model;

pub use error::TypeError;
pub use hash::ContentHash;
pub use model::ModelNode;
