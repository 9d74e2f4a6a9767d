use serde::{Deserialize, Serialize};

/// Settings for opening remote content.
///
/// Timeouts default to `None`: this layer imposes none of its own and
/// leaves timeout behavior to the transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// `User-Agent` sent with HTTP requests.
    pub user_agent: String,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Per-read timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// URL schemes content may be fetched from.
    pub allowed_schemes: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("dcp/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: None,
            read_timeout_secs: None,
            allowed_schemes: vec!["http".into(), "https".into(), "file".into()],
        }
    }
}

impl FetchConfig {
    /// Returns `true` if content may be fetched over `scheme`.
    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.allowed_schemes
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(scheme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = FetchConfig::default();
        assert!(c.user_agent.starts_with("dcp/"));
        assert!(c.connect_timeout_secs.is_none());
        assert!(c.read_timeout_secs.is_none());
        assert!(c.allows_scheme("https"));
        assert!(c.allows_scheme("FILE"));
        assert!(!c.allows_scheme("ftp"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c: FetchConfig = toml::from_str("read_timeout_secs = 30").unwrap();
        assert_eq!(c.read_timeout_secs, Some(30));
        assert_eq!(c.allowed_schemes, FetchConfig::default().allowed_schemes);
    }
}
