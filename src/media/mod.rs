// Media capabilities used by the converter and the inspector
//
// - Commands: subprocess command representation and builders
// - FFmpeg: transcoder backed by the ffmpeg binary
// - FFprobe: media reader backed by the ffprobe binary

pub mod commands;
pub mod ffmpeg;
pub mod ffprobe;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use ffmpeg::FfmpegTranscoder;
pub use ffprobe::FfprobeReader;

use crate::config::MediaConfig;
use crate::error::Result;

/// Exit status of a finished subprocess, with its combined stdout/stderr when
/// captured (empty when the output went to the null device)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub output: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Frame geometry and rate of a video stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoProperties {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

/// Result of trying to open a file as a video
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpenOutcome {
    Opened(VideoProperties),
    FailedToOpen,
}

/// Runs the external transcoder
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Run a command to completion and return its exit status. The
    /// transcoder's own output is discarded.
    async fn run(&self, command: &MediaCommand) -> Result<ProcessOutput>;

    /// Check if the transcoder binary can be started
    async fn check_availability(&self) -> Result<()>;
}

/// Reads basic video properties from a file
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaReader: Send + Sync {
    /// Try to open `path` as a video. Not being a readable video is
    /// `OpenOutcome::FailedToOpen`, not an error.
    async fn open(&self, path: &Path) -> Result<OpenOutcome>;
}

/// Factory for the ffmpeg-backed capabilities
pub struct MediaFactory;

impl MediaFactory {
    pub fn command_builder(config: &MediaConfig) -> MediaCommandBuilder {
        MediaCommandBuilder::new(&config.ffmpeg_path, &config.ffprobe_path)
    }

    pub fn create_transcoder(config: &MediaConfig) -> Box<dyn Transcoder> {
        Box::new(FfmpegTranscoder::new(config.clone()))
    }

    pub fn create_reader(config: &MediaConfig) -> Box<dyn MediaReader> {
        Box::new(FfprobeReader::new(config.clone()))
    }
}
