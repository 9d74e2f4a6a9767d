use dcp_store::StoreError;
use dcp_types::{fields, ModelNode};
use thiserror::Error;

/// Errors raised while resolving, storing, and rewriting deployment content.
///
/// Every variant is terminal for the call that raised it.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Content list missing or malformed, content already carries a hash,
    /// or the stream index is not an integer.
    #[error("invalid content declaration")]
    InvalidContentDeclaration,

    /// Stream index outside `0..count` of the attached streams.
    #[error(
        "invalid value for {field}: {requested}, the maximum index is {max}",
        field = fields::INPUT_STREAM_INDEX
    )]
    StreamIndexOutOfRange { requested: i64, max: i64 },

    /// Index in range, but its slot holds no stream.
    #[error("no input stream available at index {index}")]
    MissingStream { index: usize },

    /// The `bytes` field is defined but is not a byte array.
    #[error("invalid inline byte content")]
    InvalidByteContent,

    /// Malformed URL or transport failure; the two differ only in `reason`.
    #[error("unable to read content from {url}: {reason}")]
    RemoteFetchFailure { url: String, reason: String },

    /// None of the source fields is defined.
    #[error(
        "no content source declared: expected one of {}, {}, {}",
        fields::INPUT_STREAM_INDEX,
        fields::BYTES,
        fields::URL
    )]
    UndeclaredContent,

    /// The repository failed while consuming the stream.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DeployError {
    /// The failure description reported back to the management client.
    pub fn failure_description(&self) -> ModelNode {
        ModelNode::from(self.to_string())
    }
}

/// Result alias for deployment content operations.
pub type DeployResult<T> = Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_field_and_bounds() {
        let err = DeployError::StreamIndexOutOfRange {
            requested: 2,
            max: 1,
        };
        assert_eq!(
            err.to_string(),
            "invalid value for input-stream-index: 2, the maximum index is 1"
        );
    }

    #[test]
    fn store_errors_pass_through_unchanged() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = DeployError::from(StoreError::from(io));
        assert_eq!(err.to_string(), "I/O error: disk full");
        assert!(matches!(err, DeployError::Store(StoreError::Io(_))));
    }

    #[test]
    fn failure_description_is_a_string_node() {
        let desc = DeployError::UndeclaredContent.failure_description();
        assert_eq!(
            desc.as_str(),
            Some("no content source declared: expected one of input-stream-index, bytes, url")
        );
    }
}
