//! Configuration sections shared by the probe and the application.
//!
//! Every field defaults sensibly so an empty section is valid.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::media::HeaderSet;

/// Default probe deadline in seconds.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Locations of external tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Explicit ffprobe binary; falls back to `PATH` when unset or missing.
    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}

/// Probe behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Hard upper bound on a single probe, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// URL schemes treated as network sources in addition to the built-in list.
    #[serde(default)]
    pub extra_network_schemes: Vec<String>,

    /// Headers sent with every network probe unless overridden per call.
    /// Kept in file order.
    #[serde(default)]
    pub default_headers: IndexMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECS
}

/// Whether `scheme` survives URL parsing as the scheme of `scheme://host`.
///
/// Network detection parses locators the same way, so a scheme accepted here
/// is one a locator can actually match.
pub fn is_valid_scheme(scheme: &str) -> bool {
    url::Url::parse(&format!("{scheme}://x"))
        .map(|u| u.scheme().eq_ignore_ascii_case(scheme))
        .unwrap_or(false)
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            extra_network_schemes: Vec::new(),
            default_headers: IndexMap::new(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn default_headers(&self) -> HeaderSet {
        self.default_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Return validation errors (fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.timeout_secs == 0 {
            errors.push("probe.timeout_secs must be greater than 0".into());
        }

        for (i, scheme) in self.extra_network_schemes.iter().enumerate() {
            if !is_valid_scheme(scheme) {
                errors.push(format!(
                    "probe.extra_network_schemes[{i}] is not a valid scheme: {scheme:?}"
                ));
            }
        }

        for name in self.default_headers.keys() {
            if name.trim().is_empty() || name.contains(':') {
                errors.push(format!(
                    "probe.default_headers has an invalid name: {name:?}"
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let cfg: ProbeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert!(cfg.extra_network_schemes.is_empty());
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = ProbeConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate().len(), 1);
    }

    #[test]
    fn bad_scheme_and_header_name_rejected() {
        let mut cfg = ProbeConfig::default();
        cfg.extra_network_schemes.push("ht tp".into());
        cfg.default_headers.insert("Bad:Name".into(), "x".into());
        assert_eq!(cfg.validate().len(), 2);
    }

    #[test]
    fn scheme_must_parse_as_url_scheme() {
        assert!(is_valid_scheme("gopher"));
        assert!(is_valid_scheme("RIST"));
        assert!(is_valid_scheme("svn+ssh"));
        assert!(!is_valid_scheme("9p"));
        assert!(!is_valid_scheme(""));
        assert!(!is_valid_scheme("a:b"));
        assert!(!is_valid_scheme("-x"));
    }

    #[test]
    fn default_headers_keep_insertion_order() {
        let cfg: ProbeConfig = serde_json::from_str(
            r#"{"default_headers": {"X-Zeta": "1", "Authorization": "2"}}"#,
        )
        .unwrap();
        assert_eq!(
            cfg.default_headers().to_param(),
            "X-Zeta: 1\r\nAuthorization: 2\r\n"
        );
    }

    #[test]
    fn default_headers_to_header_set() {
        let mut cfg = ProbeConfig::default();
        cfg.default_headers.insert("User-Agent".into(), "mediaprobe".into());
        assert_eq!(cfg.default_headers().to_param(), "User-Agent: mediaprobe\r\n");
    }
}
