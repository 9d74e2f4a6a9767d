//! Field names of the management operation model.

/// Operation name.
pub const OP: &str = "operation";
/// Operation target address: a list of single-entry path elements.
pub const OP_ADDR: &str = "address";
/// Content list of a deployment operation.
pub const CONTENT: &str = "content";
/// Content hash of already-stored content.
pub const HASH: &str = "hash";
/// Inline content bytes.
pub const BYTES: &str = "bytes";
/// Remote content location.
pub const URL: &str = "url";
/// Index into the operation's attached input streams.
pub const INPUT_STREAM_INDEX: &str = "input-stream-index";
/// Name of the composite operation.
pub const COMPOSITE: &str = "composite";
/// Steps of a composite operation.
pub const STEPS: &str = "steps";
/// JSON key used when rendering byte values.
pub const BYTES_VALUE: &str = "bytes-value";
