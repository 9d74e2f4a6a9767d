use dcp_types::{fields, ModelNode};

use crate::error::{DeployError, DeployResult};

/// Where a content descriptor says its bytes come from.
///
/// A descriptor may define several source fields; the first one defined in
/// the order stream index, inline bytes, URL wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentSource<'a> {
    /// Index into the operation's attached input streams.
    StreamIndex(i64),
    /// Bytes carried inline in the operation.
    InlineBytes(&'a [u8]),
    /// Location to fetch the bytes from.
    RemoteUrl(&'a str),
}

impl<'a> ContentSource<'a> {
    /// Select the source declared by `descriptor`.
    pub fn from_descriptor(descriptor: &'a ModelNode) -> DeployResult<Self> {
        if let Some(index) = descriptor.get_defined(fields::INPUT_STREAM_INDEX) {
            return index
                .as_int()
                .map(Self::StreamIndex)
                .ok_or(DeployError::InvalidContentDeclaration);
        }
        if let Some(bytes) = descriptor.get_defined(fields::BYTES) {
            return bytes
                .as_bytes()
                .map(Self::InlineBytes)
                .ok_or(DeployError::InvalidByteContent);
        }
        if let Some(url) = descriptor.get_defined(fields::URL) {
            return url
                .as_str()
                .map(Self::RemoteUrl)
                .ok_or_else(|| DeployError::RemoteFetchFailure {
                    url: url.to_string(),
                    reason: "url is not a string".into(),
                });
        }
        Err(DeployError::UndeclaredContent)
    }

    /// Field name of the selected source, for logging.
    pub fn field(&self) -> &'static str {
        match self {
            Self::StreamIndex(_) => fields::INPUT_STREAM_INDEX,
            Self::InlineBytes(_) => fields::BYTES,
            Self::RemoteUrl(_) => fields::URL,
        }
    }
}
