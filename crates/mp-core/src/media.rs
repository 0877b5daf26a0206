//! Media-domain types for a single inspection: what the caller requires, the
//! headers it wants sent, the streams the probe reported, and the outcome.
//!
//! Everything here is created fresh per inspection; nothing is shared.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Codec names that ffprobe reports for a single embedded picture (cover art
/// and the like) rather than real motion video.
pub const STILL_IMAGE_CODECS: &[&str] = &["png", "jpeg", "jpg", "mjpeg"];

// ---------------------------------------------------------------------------
// Requirements
// ---------------------------------------------------------------------------

/// What the caller needs from a source.
///
/// Both flags may be false, in which case the inspection only describes what
/// exists and never fails for lack of a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    /// An audio stream must be present.
    pub need_audio: bool,
    /// A video stream with valid dimensions must be present.
    pub need_video: bool,
    /// Count still-image codecs (png, jpeg, ...) as video.
    ///
    /// Off by default: a picture attached to an audio file is not video.
    pub include_still_images: bool,
}

impl Requirements {
    /// Require nothing.
    pub const fn none() -> Self {
        Self {
            need_audio: false,
            need_video: false,
            include_still_images: false,
        }
    }

    /// Require an audio stream.
    pub const fn audio() -> Self {
        Self::none().with_audio(true)
    }

    /// Require a video stream.
    pub const fn video() -> Self {
        Self::none().with_video(true)
    }

    pub const fn with_audio(mut self, need: bool) -> Self {
        self.need_audio = need;
        self
    }

    pub const fn with_video(mut self, need: bool) -> Self {
        self.need_video = need;
        self
    }

    pub const fn with_still_images(mut self, include: bool) -> Self {
        self.include_still_images = include;
        self
    }
}

// ---------------------------------------------------------------------------
// HeaderSet
// ---------------------------------------------------------------------------

/// Custom transport headers for network sources.
///
/// Keeps insertion order so the serialized parameter is deterministic.
/// Inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, replacing the value of an existing header with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Parse a `"Name: Value"` line, as given on a command line.
    ///
    /// Returns `None` when there is no colon or the name is empty.
    pub fn parse_line(line: &str) -> Option<(String, String)> {
        let (name, value) = line.split_once(':')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), value.trim().to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as the single value ffprobe's `-headers` option expects:
    /// `"Name: Value\r\n"` per header, concatenated with no separator.
    pub fn to_param(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}: {v}\r\n"))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = HeaderSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for HeaderSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

// ---------------------------------------------------------------------------
// StreamDescriptor
// ---------------------------------------------------------------------------

/// Kind of a reported stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
    Other,
}

impl CodecType {
    /// Map ffprobe's `codec_type` string. Anything other than video or audio
    /// (subtitle, data, attachment, missing) is [`CodecType::Other`].
    pub fn from_ffprobe(s: Option<&str>) -> Self {
        match s {
            Some("video") => Self::Video,
            Some("audio") => Self::Audio,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// One stream as reported by the probe. Zero width/height means unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub codec_type: CodecType,
    pub codec_name: String,
    pub width: u32,
    pub height: u32,
}

impl StreamDescriptor {
    pub fn video(codec_name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            codec_type: CodecType::Video,
            codec_name: codec_name.into(),
            width,
            height,
        }
    }

    pub fn audio(codec_name: impl Into<String>) -> Self {
        Self {
            codec_type: CodecType::Audio,
            codec_name: codec_name.into(),
            width: 0,
            height: 0,
        }
    }

    /// Whether the codec is one used for single embedded pictures.
    pub fn is_still_image(&self) -> bool {
        STILL_IMAGE_CODECS.contains(&self.codec_name.as_str())
    }

    /// Both dimensions are known and non-zero.
    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

// ---------------------------------------------------------------------------
// InspectionResult
// ---------------------------------------------------------------------------

/// Successful outcome of an inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InspectionResult {
    /// Audio was required (video was not) and found.
    AudioOnly { header_applied: bool },
    /// A qualifying video stream with non-zero dimensions was found.
    VideoPresent {
        width: u32,
        height: u32,
        header_applied: bool,
    },
    /// Nothing qualifying was found and nothing was required.
    NoQualifyingStream,
}

impl InspectionResult {
    /// Whether custom headers were sent to the probe.
    pub fn header_applied(&self) -> bool {
        match self {
            Self::AudioOnly { header_applied } | Self::VideoPresent { header_applied, .. } => {
                *header_applied
            }
            Self::NoQualifyingStream => false,
        }
    }

    /// Video dimensions, if a video stream was found.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Self::VideoPresent { width, height, .. } => Some((*width, *height)),
            _ => None,
        }
    }
}

impl fmt::Display for InspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AudioOnly { .. } => write!(f, "audio"),
            Self::VideoPresent { width, height, .. } => write!(f, "video {width}x{height}"),
            Self::NoQualifyingStream => write!(f, "no qualifying stream"),
        }
    }
}
