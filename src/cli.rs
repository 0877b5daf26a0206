use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediaprobe")]
#[command(author, version, about = "Inspect the audio/video composition of a media source")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect a local file or network source
    Inspect {
        /// File path or URL to inspect
        #[arg(required = true)]
        locator: String,

        /// Fail unless an audio stream is present
        #[arg(long)]
        audio: bool,

        /// Fail unless a video stream with valid dimensions is present
        #[arg(long)]
        video: bool,

        /// Count still images (png, jpeg, mjpeg) as video
        #[arg(long)]
        count_images: bool,

        /// Extra header for network sources, as "Name: Value" (repeatable)
        #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
        headers: Vec<String>,

        /// Probe timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        #[arg(value_name = "CONFIG")]
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
