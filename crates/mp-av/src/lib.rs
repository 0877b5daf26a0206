//! # mp-av
//!
//! External tool plumbing and media source inspection.
//!
//! This crate provides:
//!
//! - **Command execution** ([`ToolCommand`]) -- async builder that runs an
//!   external process under a hard deadline and kills it on expiry.
//! - **Tool discovery** ([`ToolRegistry`]) -- find ffprobe from config or
//!   `PATH` and report its version.
//! - **Network detection** ([`ProtocolSupport`], [`NetworkSchemes`]) --
//!   decide whether a locator may receive custom headers.
//! - **Inspection** ([`MediaProbe`]) -- probe a locator once and classify its
//!   audio/video composition against [`mp_core::Requirements`].
//!
//! ## Example
//!
//! ```no_run
//! use mp_av::MediaProbe;
//! use mp_core::Requirements;
//!
//! # async fn example() -> mp_core::Result<()> {
//! let probe = MediaProbe::from_path()?;
//! let result = probe.inspect("/music/track.flac", &Requirements::audio(), None).await?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod probe;
pub mod protocol;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use probe::MediaProbe;
pub use protocol::{NetworkSchemes, ProtocolSupport};
pub use tools::{ToolInfo, ToolRegistry};
