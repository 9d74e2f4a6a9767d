use std::fs::File;
use std::io::{self, Read};
use std::time::Duration;

use url::Url;

use crate::config::FetchConfig;

/// A stream opened from a remote location.
pub type RemoteStream = Box<dyn Read + Send>;

/// Opens a readable stream for a parsed URL.
///
/// Implementations make a single attempt; retries, if any, belong to the
/// transport underneath.
pub trait RemoteOpener: Send + Sync {
    fn open(&self, url: &Url) -> io::Result<RemoteStream>;
}

/// Default opener: HTTP(S) through `ureq`, `file` URLs from local disk.
pub struct UreqOpener {
    agent: ureq::Agent,
}

impl UreqOpener {
    pub fn new(config: &FetchConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new().user_agent(&config.user_agent);
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.timeout_connect(Duration::from_secs(secs));
        }
        if let Some(secs) = config.read_timeout_secs {
            builder = builder.timeout_read(Duration::from_secs(secs));
        }
        Self {
            agent: builder.build(),
        }
    }
}

impl Default for UreqOpener {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

impl RemoteOpener for UreqOpener {
    fn open(&self, url: &Url) -> io::Result<RemoteStream> {
        if url.scheme() == "file" {
            let path = url.to_file_path().map_err(|()| {
                io::Error::new(io::ErrorKind::InvalidInput, "file URL has no local path")
            })?;
            let file = File::open(&path)?;
            if !file.metadata()?.is_file() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is not a regular file", path.display()),
                ));
            }
            return Ok(Box::new(file));
        }
        // Non-2xx statuses come back as errors from `call`.
        let response = self
            .agent
            .request_url("GET", url)
            .call()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(response.into_reader())
    }
}

impl std::fmt::Debug for UreqOpener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqOpener").finish_non_exhaustive()
    }
}
