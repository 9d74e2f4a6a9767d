use std::io::{self, Read};

use dcp_types::{fields, ModelNode};
use tracing::debug;
use url::Url;

use crate::config::FetchConfig;
use crate::context::{AttachedStream, ExecutionContext};
use crate::error::{DeployError, DeployResult};
use crate::remote::{RemoteOpener, RemoteStream, UreqOpener};
use crate::source::ContentSource;

/// Content resolved to a single readable stream.
///
/// Owned streams are released when this value is dropped.
pub enum ResolvedContent<'a> {
    /// Stream handed over by the execution context.
    Attached(AttachedStream),
    /// Bytes borrowed from the operation itself.
    Inline(&'a [u8]),
    /// Stream opened from a URL.
    Remote(RemoteStream),
}

impl ResolvedContent<'_> {
    /// Field name of the source this content came from.
    pub fn source_field(&self) -> &'static str {
        match self {
            Self::Attached(_) => fields::INPUT_STREAM_INDEX,
            Self::Inline(_) => fields::BYTES,
            Self::Remote(_) => fields::URL,
        }
    }
}

impl Read for ResolvedContent<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Attached(stream) => stream.read(buf),
            Self::Inline(bytes) => bytes.read(buf),
            Self::Remote(stream) => stream.read(buf),
        }
    }
}

impl std::fmt::Debug for ResolvedContent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inline(bytes) => write!(f, "ResolvedContent::Inline({} bytes)", bytes.len()),
            other => write!(f, "ResolvedContent({})", other.source_field()),
        }
    }
}

/// Turns a content descriptor into exactly one readable stream.
///
/// Every call resolves afresh with a single attempt per source: no
/// retries, no caching.
pub struct ContentResolver {
    opener: Box<dyn RemoteOpener>,
    config: FetchConfig,
}

impl ContentResolver {
    /// Resolver using the default [`UreqOpener`] built from `config`.
    pub fn new(config: FetchConfig) -> Self {
        let opener = UreqOpener::new(&config);
        Self::with_opener(config, opener)
    }

    /// Resolver that opens URLs through a custom opener.
    pub fn with_opener(config: FetchConfig, opener: impl RemoteOpener + 'static) -> Self {
        Self {
            opener: Box::new(opener),
            config,
        }
    }

    /// Resolve `descriptor` to a stream.
    ///
    /// Sources are tried in priority order: attached stream index, inline
    /// bytes, then URL. The stream index is range-checked against the
    /// context before any stream is taken from it.
    pub fn resolve<'a, C>(
        &self,
        descriptor: &'a ModelNode,
        context: &mut C,
    ) -> DeployResult<ResolvedContent<'a>>
    where
        C: ExecutionContext + ?Sized,
    {
        let source = ContentSource::from_descriptor(descriptor)?;
        debug!(source = source.field(), "resolving deployment content");
        match source {
            ContentSource::StreamIndex(requested) => {
                let count = context.attached_stream_count();
                let index = usize::try_from(requested)
                    .ok()
                    .filter(|index| *index < count)
                    .ok_or(DeployError::StreamIndexOutOfRange {
                        requested,
                        max: count as i64 - 1,
                    })?;
                context
                    .take_attached_stream(index)
                    .map(ResolvedContent::Attached)
                    .ok_or(DeployError::MissingStream { index })
            }
            ContentSource::InlineBytes(bytes) => Ok(ResolvedContent::Inline(bytes)),
            ContentSource::RemoteUrl(location) => {
                self.open_remote(location).map(ResolvedContent::Remote)
            }
        }
    }

    fn open_remote(&self, location: &str) -> DeployResult<RemoteStream> {
        let failure = |reason: String| DeployError::RemoteFetchFailure {
            url: location.to_string(),
            reason,
        };
        let url = Url::parse(location).map_err(|e| failure(format!("malformed url: {e}")))?;
        if !self.config.allows_scheme(url.scheme()) {
            return Err(failure(format!("scheme '{}' is not allowed", url.scheme())));
        }
        self.opener
            .open(&url)
            .map_err(|e| failure(format!("unable to open stream: {e}")))
    }
}

impl Default for ContentResolver {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}
