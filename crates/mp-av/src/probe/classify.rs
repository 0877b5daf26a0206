//! Stream classification and requirement enforcement.
//!
//! Classification is a single pass over the reported streams. All flags only
//! ever go from false to true, so the outcome does not depend on stream order
//! except for which dimensions are reported when several video streams have
//! valid ones (the first wins).

use mp_core::{CodecType, Error, InspectionResult, Requirements, Result, StreamDescriptor};

/// What a scan of the reported streams found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    /// A qualifying video stream was reported.
    pub have_video: bool,
    /// An audio stream was reported.
    pub have_audio: bool,
    /// A qualifying video stream had both dimensions non-zero.
    pub have_valid_video: bool,
    /// Dimensions of the first qualifying video stream with valid ones.
    pub width: u32,
    pub height: u32,
}

/// Whether `stream` counts as video under `req`.
///
/// Still-image codecs only count when the caller opted in.
pub fn is_qualifying_video(stream: &StreamDescriptor, req: &Requirements) -> bool {
    stream.codec_type == CodecType::Video
        && (req.include_still_images || !stream.is_still_image())
}

/// Scan `streams` and accumulate what was found.
pub fn classify(streams: &[StreamDescriptor], req: &Requirements) -> Classification {
    let mut c = Classification::default();

    for stream in streams {
        match stream.codec_type {
            CodecType::Video if is_qualifying_video(stream, req) => {
                c.have_video = true;
                if stream.has_dimensions() && !c.have_valid_video {
                    c.have_valid_video = true;
                    c.width = stream.width;
                    c.height = stream.height;
                }
            }
            CodecType::Audio => c.have_audio = true,
            _ => {}
        }
    }

    c
}

/// Check `c` against `req` and produce the outcome for `locator`.
pub fn enforce(
    c: &Classification,
    req: &Requirements,
    locator: &str,
    header_applied: bool,
) -> Result<InspectionResult> {
    if req.need_video {
        if !c.have_video {
            return Err(Error::NoVideoSourceFound {
                locator: locator.to_string(),
            });
        }
        if !c.have_valid_video {
            return Err(Error::InvalidVideoProportion {
                locator: locator.to_string(),
            });
        }
    }

    if req.need_audio && !c.have_audio {
        return Err(Error::NoAudioSourceFound {
            locator: locator.to_string(),
        });
    }

    if req.need_audio && !req.need_video {
        return Ok(InspectionResult::AudioOnly { header_applied });
    }

    // A video stream without usable dimensions never yields VideoPresent.
    if c.have_valid_video {
        return Ok(InspectionResult::VideoPresent {
            width: c.width,
            height: c.height,
            header_applied,
        });
    }

    Ok(InspectionResult::NoQualifyingStream)
}
