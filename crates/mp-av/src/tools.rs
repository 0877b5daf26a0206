//! External tool detection.
//!
//! The [`ToolRegistry`] resolves the location of the probing tool once,
//! either from configuration or from `PATH`, and reports its availability.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use mp_core::config::{ProbeConfig, ToolsConfig};
use mp_core::{Error, Result};

use crate::command::{ToolCommand, DEFAULT_TIMEOUT};
use crate::probe::MediaProbe;
use crate::protocol::NetworkSchemes;

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &["ffprobe"];

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool paths.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, PathBuf>,
}

impl ToolRegistry {
    /// Discover tools, preferring a configured path that exists over `PATH`.
    ///
    /// Tools that are not found are omitted from the registry.
    pub fn discover(tools_config: &ToolsConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                "ffprobe" => tools_config.ffprobe_path.as_deref(),
                _ => None,
            };

            if let Some(path) = resolve(name, custom_path) {
                tracing::debug!(tool = name, path = %path.display(), "resolved tool");
                tools.insert(name.to_string(), path);
            } else {
                tracing::debug!(tool = name, "tool not found");
            }
        }

        Self { tools }
    }

    /// Path of `name`, or [`Error::ProbeToolMissing`] if discovery did not find it.
    pub fn require(&self, name: &str) -> Result<&Path> {
        self.tools
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::tool_missing(name))
    }

    /// Build a [`MediaProbe`] from the discovered ffprobe and probe settings.
    pub fn media_probe(&self, probe_config: &ProbeConfig) -> Result<MediaProbe> {
        let path = self.require("ffprobe")?;
        Ok(MediaProbe::new(path.to_path_buf())
            .with_timeout(probe_config.timeout())
            .with_protocols(NetworkSchemes::with_extra(
                probe_config.extra_network_schemes.iter().cloned(),
            )))
    }

    /// Check all known tools and return availability information.
    ///
    /// Each version query is bounded by [`DEFAULT_TIMEOUT`].
    pub async fn check_all(&self) -> Vec<ToolInfo> {
        let mut infos = Vec::with_capacity(KNOWN_TOOLS.len());
        for &name in KNOWN_TOOLS {
            let info = match self.tools.get(name) {
                Some(path) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(path, DEFAULT_TIMEOUT).await,
                    path: Some(path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            };
            infos.push(info);
        }
        infos
    }
}

fn resolve(name: &str, custom_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = custom_path {
        if p.exists() {
            return Some(p.to_path_buf());
        }
        tracing::warn!(
            tool = name,
            "configured path {} does not exist; searching PATH",
            p.display()
        );
    }
    which::which(name).ok()
}

/// Run `<tool> -version` and return the first line of stdout.
///
/// Gives up with `None` once `timeout` expires.
async fn detect_version(path: &Path, timeout: Duration) -> Option<String> {
    let mut cmd = ToolCommand::new(path.to_path_buf());
    cmd.arg("-version").timeout(timeout);

    let output = match cmd.execute().await {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!(path = %path.display(), "version query failed: {e}");
            return None;
        }
    };

    if !output.status.success() {
        return None;
    }

    output.stdout
        .lines()
        .next()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn fake_tool(dir: &Path, body: &str) -> PathBuf {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("ffprobe");
        {
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(f, "#!/bin/sh\n{body}").unwrap();
            f.sync_all().unwrap();
        }
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn discover_with_default_config() {
        let registry = ToolRegistry::discover(&ToolsConfig::default());
        // Whether ffprobe is installed varies; the call itself must not panic.
        let infos = registry.check_all().await;
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].name, "ffprobe");
    }

    #[test]
    fn require_missing_tool_returns_error() {
        let registry = ToolRegistry::default();
        assert!(matches!(
            registry.require("ffprobe"),
            Err(Error::ProbeToolMissing { .. })
        ));
        assert!(registry.media_probe(&ProbeConfig::default()).is_err());
    }

    #[test]
    fn configured_path_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("my-ffprobe");
        std::fs::write(&fake, "").unwrap();

        let cfg = ToolsConfig {
            ffprobe_path: Some(fake.clone()),
        };
        let registry = ToolRegistry::discover(&cfg);
        assert_eq!(registry.require("ffprobe").unwrap(), fake.as_path());

        let probe = registry.media_probe(&ProbeConfig::default()).unwrap();
        assert_eq!(probe.ffprobe_path(), fake.as_path());
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial_test::serial]
    async fn version_is_first_stdout_line() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "echo 'ffprobe version 6.1'\necho 'built with gcc'");

        let cfg = ToolsConfig {
            ffprobe_path: Some(tool.clone()),
        };
        let infos = ToolRegistry::discover(&cfg).check_all().await;
        assert!(infos[0].available);
        assert_eq!(infos[0].version.as_deref(), Some("ffprobe version 6.1"));
        assert_eq!(infos[0].path.as_deref(), Some(tool.as_path()));
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial_test::serial]
    async fn hanging_version_query_gives_up() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "exec sleep 10");

        let started = std::time::Instant::now();
        let version = detect_version(&tool, Duration::from_millis(200)).await;
        assert!(version.is_none());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn tool_info_serialization() {
        let info = ToolInfo {
            name: "ffprobe".into(),
            available: false,
            version: None,
            path: None,
        };
        let json = serde_json::to_string(&info).unwrap();
        let back: ToolInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "ffprobe");
        assert!(!back.available);
    }
}
