//! FFprobe-based media reading.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::config::MediaConfig;
use crate::error::Result;
use super::{MediaCommandBuilder, MediaReader, OpenOutcome, VideoProperties};

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

/// Media reader that shells out to ffprobe
pub struct FfprobeReader {
    command_builder: MediaCommandBuilder,
}

impl FfprobeReader {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            command_builder: MediaCommandBuilder::new(config.ffmpeg_path, config.ffprobe_path),
        }
    }
}

#[async_trait]
impl MediaReader for FfprobeReader {
    async fn open(&self, path: &Path) -> Result<OpenOutcome> {
        let output = self.command_builder.probe_video(path).execute().await?;

        if !output.success() {
            debug!(
                "ffprobe could not open {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.output).trim()
            );
            return Ok(OpenOutcome::FailedToOpen);
        }

        parse_probe_output(&output.output)
    }
}

/// Interpret ffprobe's JSON. No video stream with dimensions means the file
/// did not open as a video.
fn parse_probe_output(json: &[u8]) -> Result<OpenOutcome> {
    let probe: FfprobeOutput = serde_json::from_slice(json)?;

    let video = probe
        .streams
        .into_iter()
        .find(|s| s.codec_type.as_deref().unwrap_or("video") == "video");

    let outcome = match video {
        Some(FfprobeStream {
            width: Some(width),
            height: Some(height),
            r_frame_rate,
            ..
        }) => OpenOutcome::Opened(VideoProperties {
            width,
            height,
            frame_rate: r_frame_rate.as_deref().map(parse_frame_rate).unwrap_or(0.0),
        }),
        _ => OpenOutcome::FailedToOpen,
    };

    Ok(outcome)
}

/// Parse `num/den` or a plain number. Unparsable rates and a zero denominator
/// read as 0.0.
pub fn parse_frame_rate(rate: &str) -> f64 {
    match rate.split_once('/') {
        Some((num, den)) => match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
            (Ok(num), Ok(den)) if den != 0.0 => num / den,
            _ => 0.0,
        },
        None => rate.trim().parse().unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), 30.0);
        assert_eq!(parse_frame_rate("2997/100"), 29.97);
        assert_eq!(parse_frame_rate("25"), 25.0);
        assert_eq!(parse_frame_rate("0/0"), 0.0);
        assert_eq!(parse_frame_rate("abc"), 0.0);
    }

    #[test]
    fn test_parse_video_stream() {
        let json = br#"{
            "programs": [],
            "streams": [
                { "codec_type": "video", "width": 640, "height": 480, "r_frame_rate": "2997/100" }
            ]
        }"#;

        assert_eq!(
            parse_probe_output(json).unwrap(),
            OpenOutcome::Opened(VideoProperties {
                width: 640,
                height: 480,
                frame_rate: 29.97,
            })
        );
    }

    #[test]
    fn test_no_video_stream_failed_to_open() {
        assert_eq!(
            parse_probe_output(br#"{ "streams": [] }"#).unwrap(),
            OpenOutcome::FailedToOpen
        );
        assert_eq!(parse_probe_output(b"{}").unwrap(), OpenOutcome::FailedToOpen);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(parse_probe_output(b"not json").is_err());
    }
}
