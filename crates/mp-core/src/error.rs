//! Unified error type for media inspection.
//!
//! Every failure of an inspection funnels into [`Error`], which carries the
//! locator (where relevant) so callers can report which source failed, and
//! maps to a process exit code via [`Error::exit_code`].

use std::time::Duration;

/// Failure kinds produced while inspecting a media source.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The probing tool could not be launched at all.
    #[error("{tool} not found; is it installed and in PATH?")]
    ProbeToolMissing {
        /// Name or path of the tool that failed to launch.
        tool: String,
    },

    /// The probing tool produced no result before the deadline.
    #[error("probe of {locator} timed out after {timeout:?}")]
    ProbeTimeout {
        /// The source being inspected.
        locator: String,
        /// The deadline that expired.
        timeout: Duration,
    },

    /// Video was required but no qualifying video stream was reported.
    #[error("no video source found: {locator}")]
    NoVideoSourceFound {
        /// The source being inspected.
        locator: String,
    },

    /// Video was required and present, but never with usable dimensions.
    #[error("invalid video proportion: {locator}")]
    InvalidVideoProportion {
        /// The source being inspected.
        locator: String,
    },

    /// Audio was required but no audio stream was reported.
    #[error("no audio source found: {locator}")]
    NoAudioSourceFound {
        /// The source being inspected.
        locator: String,
    },

    /// Talking to the tool process failed after it was launched.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool.
        tool: String,
        /// Human-readable error description.
        message: String,
    },
}

impl Error {
    /// Map this error to a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ProbeToolMissing { .. } => 127,
            Error::ProbeTimeout { .. } => 124,
            Error::NoVideoSourceFound { .. }
            | Error::InvalidVideoProportion { .. }
            | Error::NoAudioSourceFound { .. } => 2,
            Error::Tool { .. } => 1,
        }
    }

    /// Whether retrying the same inspection could plausibly succeed.
    ///
    /// Only a timeout means "could not determine"; every other failure is a
    /// definite answer or a configuration problem.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::ProbeTimeout { .. })
    }

    /// Convenience constructor for [`Error::ProbeToolMissing`].
    pub fn tool_missing(tool: impl Into<String>) -> Self {
        Error::ProbeToolMissing { tool: tool.into() }
    }

    /// Convenience constructor for [`Error::ProbeTimeout`].
    pub fn timeout(locator: impl Into<String>, timeout: Duration) -> Self {
        Error::ProbeTimeout {
            locator: locator.into(),
            timeout,
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
