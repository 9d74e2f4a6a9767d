//! Deployment content ingestion for replicated management operations.
//!
//! A deployment operation arrives carrying raw content: an index into the
//! caller's attached streams, inline bytes, or a URL. Before the operation
//! can be persisted or forwarded to subordinate nodes, that content is
//! resolved to a stream, stored in a content-addressed repository, and the
//! operation is rewritten to reference the stored content by hash.
//!
//! # Flow
//!
//! 1. [`ContentUploader`] validates the operation's content declaration.
//! 2. [`ContentResolver`] picks exactly one [`ContentSource`] and opens it.
//! 3. The stream is drained into a [`ContentRepository`], yielding a hash.
//! 4. A deep copy of the operation has its content replaced by `[{hash}]`
//!    and is queued as a [`CompositeOperationAwareTransformer`] on the
//!    [`ExecutionContext`].
//!
//! The operation passed in is never modified.
//!
//! [`ContentRepository`]: dcp_store::ContentRepository

pub mod config;
pub mod context;
pub mod error;
pub mod remote;
pub mod resolver;
pub mod source;
pub mod transformer;
pub mod upload;

pub use config::FetchConfig;
pub use context::{AttachedStream, ExecutionContext, UnitOfWork};
pub use error::{DeployError, DeployResult};
pub use remote::{RemoteOpener, RemoteStream, UreqOpener};
pub use resolver::{ContentResolver, ResolvedContent};
pub use source::ContentSource;
pub use transformer::{CompositeOperationAwareTransformer, OperationTransformer, TransformerQueue};
pub use upload::{store_content_and_transform, ContentUploader};
