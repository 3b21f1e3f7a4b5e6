use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::MediaConfig;
use crate::error::{AviconvError, Result};
use super::{MediaCommand, MediaCommandBuilder, ProcessOutput, Transcoder};

/// Transcoder that runs the ffmpeg binary as a subprocess
pub struct FfmpegTranscoder {
    command_builder: MediaCommandBuilder,
}

impl FfmpegTranscoder {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            command_builder: MediaCommandBuilder::new(config.ffmpeg_path, config.ffprobe_path),
        }
    }

    /// First line of `ffmpeg -version`
    pub async fn version_info(&self) -> Result<String> {
        let output = self.command_builder.ffmpeg_version().execute().await?;
        if !output.success() {
            return Err(AviconvError::Media("FFmpeg version check failed".to_string()));
        }

        let text = String::from_utf8_lossy(&output.output);
        Ok(text.lines().next().unwrap_or("Unknown version").to_string())
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn run(&self, command: &MediaCommand) -> Result<ProcessOutput> {
        command.status().await
    }

    async fn check_availability(&self) -> Result<()> {
        let version = self.version_info().await?;
        info!("FFmpeg is available");
        debug!("{}", version);
        Ok(())
    }
}
