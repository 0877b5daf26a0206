//! Media source inspection.
//!
//! [`MediaProbe`] runs ffprobe once against a locator, bounded by a deadline,
//! and classifies the reported streams against the caller's
//! [`Requirements`].

mod classify;
mod ffprobe;

pub use classify::{classify, enforce, is_qualifying_video, Classification};
pub use ffprobe::{build_args, parse_streams, STREAM_ENTRIES};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mp_core::{Error, HeaderSet, InspectionResult, Requirements, Result};

use crate::command::{ToolCommand, DEFAULT_TIMEOUT};
use crate::protocol::{NetworkSchemes, ProtocolSupport};

/// Inspects media sources with the `ffprobe` CLI.
///
/// Holds no mutable state; one value can serve any number of concurrent
/// inspections, each of which owns its own subprocess.
#[derive(Clone)]
pub struct MediaProbe {
    /// Path to the ffprobe binary.
    ffprobe_path: PathBuf,
    timeout: Duration,
    protocols: Arc<dyn ProtocolSupport>,
}

impl std::fmt::Debug for MediaProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaProbe")
            .field("ffprobe_path", &self.ffprobe_path)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl MediaProbe {
    /// Create a probe using the given ffprobe path.
    pub fn new(ffprobe_path: PathBuf) -> Self {
        Self {
            ffprobe_path,
            timeout: DEFAULT_TIMEOUT,
            protocols: Arc::new(NetworkSchemes::default()),
        }
    }

    /// Create a probe that finds ffprobe on `PATH`.
    pub fn from_path() -> Result<Self> {
        which::which("ffprobe")
            .map(Self::new)
            .map_err(|_| Error::tool_missing("ffprobe"))
    }

    /// Set the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the network-locator predicate.
    pub fn with_protocols(mut self, protocols: impl ProtocolSupport + 'static) -> Self {
        self.protocols = Arc::new(protocols);
        self
    }

    pub fn ffprobe_path(&self) -> &std::path::Path {
        &self.ffprobe_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Header parameter to send for `locator`, if any.
    ///
    /// Headers are only sent to network locators; for local paths they are
    /// dropped even when supplied.
    pub fn header_param(&self, locator: &str, headers: Option<&HeaderSet>) -> Option<String> {
        let headers = headers.filter(|h| !h.is_empty())?;
        if !self.protocols.is_network(locator) {
            tracing::debug!(locator, "ignoring headers for local source");
            return None;
        }
        Some(headers.to_param())
    }

    /// Inspect `locator` and check it against `req`.
    ///
    /// Spawns exactly one ffprobe process and never retries. The call takes
    /// at most the configured timeout plus the time to kill the process.
    ///
    /// # Errors
    ///
    /// - [`Error::ProbeToolMissing`] if ffprobe cannot be launched.
    /// - [`Error::ProbeTimeout`] if ffprobe did not finish in time.
    /// - [`Error::NoVideoSourceFound`], [`Error::InvalidVideoProportion`],
    ///   [`Error::NoAudioSourceFound`] when a requirement is not met.
    pub async fn inspect(
        &self,
        locator: &str,
        req: &Requirements,
        headers: Option<&HeaderSet>,
    ) -> Result<InspectionResult> {
        let header_param = self.header_param(locator, headers);
        let header_applied = header_param.is_some();

        let mut cmd = ToolCommand::new(self.ffprobe_path.clone());
        cmd.args(build_args(locator, header_param.as_deref()))
            .timeout(self.timeout)
            .subject(locator);

        // ffprobe exits non-zero for unreadable sources; its (empty) output
        // still goes through the normal "no streams" path.
        let output = cmd.execute().await?;
        if !output.status.success() {
            tracing::debug!(
                locator,
                status = %output.status,
                stderr = output.stderr.trim(),
                "ffprobe exited unsuccessfully"
            );
        }

        let streams = parse_streams(&output.stdout);
        let classification = classify(&streams, req);
        let result = enforce(&classification, req, locator, header_applied);

        match &result {
            Ok(r) => tracing::info!(locator, streams = streams.len(), "inspected: {r}"),
            Err(e) => tracing::info!(locator, streams = streams.len(), "inspection failed: {e}"),
        }

        result
    }
}
