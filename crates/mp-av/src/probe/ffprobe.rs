//! ffprobe invocation and output parsing.
//!
//! The probe asks for exactly four stream entries in JSON:
//! `ffprobe -v error -show_entries stream=width,height,codec_type,codec_name -of json [-headers H] LOCATOR`

use serde::{Deserialize, Deserializer};

use mp_core::{CodecType, StreamDescriptor};

/// Stream entries requested from ffprobe.
pub const STREAM_ENTRIES: &str = "stream=width,height,codec_type,codec_name";

/// Build the ffprobe argument list for `locator`.
///
/// `header_param` is the already-serialized header block; it is passed as
/// the value of a separate `-headers` argument ahead of the input, since
/// ffprobe only applies input options that precede the input.
pub fn build_args(locator: &str, header_param: Option<&str>) -> Vec<String> {
    let mut args: Vec<String> = [
        "-v",
        "error",
        "-show_entries",
        STREAM_ENTRIES,
        "-of",
        "json",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    if let Some(param) = header_param {
        args.push("-headers".into());
        args.push(param.into());
    }

    args.push(locator.into());
    args
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    width: u32,
    #[serde(default, deserialize_with = "lenient_dimension")]
    height: u32,
}

/// Accept a number, a numeric string or null; anything else becomes 0.
fn lenient_dimension<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let n = match value {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(n).unwrap_or(0))
}

/// Parse ffprobe's stdout into stream descriptors.
///
/// Empty, malformed or stream-less output yields an empty list: an unusable
/// answer counts as "nothing found".
pub fn parse_streams(stdout: &str) -> Vec<StreamDescriptor> {
    if stdout.trim().is_empty() {
        tracing::debug!("ffprobe produced no output; treating as no streams");
        return Vec::new();
    }

    let output: FfprobeOutput = match serde_json::from_str(stdout) {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("ffprobe output is not usable JSON ({e}); treating as no streams");
            return Vec::new();
        }
    };

    output
        .streams
        .into_iter()
        .map(|s| StreamDescriptor {
            codec_type: CodecType::from_ffprobe(s.codec_type.as_deref()),
            codec_name: s.codec_name.unwrap_or_default(),
            width: s.width,
            height: s.height,
        })
        .collect()
}
