//! Deciding whether a locator is a network resource.
//!
//! Header injection only means something for network sources, so the probe
//! asks a [`ProtocolSupport`] before sending headers.

/// URL schemes ffprobe reads over the network.
pub const DEFAULT_NETWORK_SCHEMES: &[&str] = &[
    "http", "https", "rtmp", "rtmps", "rtsp", "rtsps", "srt", "tcp", "udp", "hls", "ftp", "mms",
    "mmsh",
];

/// Predicate telling network locators apart from local paths.
///
/// Implemented for closures so callers can plug in their own policy.
pub trait ProtocolSupport: Send + Sync {
    /// Whether `locator` names a network resource.
    fn is_network(&self, locator: &str) -> bool;
}

impl<F> ProtocolSupport for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_network(&self, locator: &str) -> bool {
        self(locator)
    }
}

/// Scheme allow-list: a locator is a network resource when it parses as an
/// absolute URL whose scheme is known. Anything that fails to parse is local.
#[derive(Debug, Clone)]
pub struct NetworkSchemes {
    schemes: Vec<String>,
}

impl Default for NetworkSchemes {
    fn default() -> Self {
        Self {
            schemes: DEFAULT_NETWORK_SCHEMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl NetworkSchemes {
    /// The built-in list plus `extra` schemes.
    pub fn with_extra(extra: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut this = Self::default();
        for scheme in extra {
            let scheme = scheme.into().to_ascii_lowercase();
            if !this.schemes.contains(&scheme) {
                this.schemes.push(scheme);
            }
        }
        this
    }

    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }
}

impl ProtocolSupport for NetworkSchemes {
    fn is_network(&self, locator: &str) -> bool {
        match url::Url::parse(locator.trim()) {
            Ok(url) => self.schemes.iter().any(|s| s == url.scheme()),
            Err(_) => false,
        }
    }
}
