use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AviconvError, Result};
use crate::profile::Profile;
use super::ProcessOutput;

/// A subprocess invocation: program, argument list and a short description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCommand {
    pub binary_path: String,
    /// Paths are kept as raw OS strings so non UTF-8 file names survive
    pub args: Vec<OsString>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().as_os_str())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().as_os_str())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    pub fn video_codec<S: Into<OsString>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Fixed video quality scale (`-q:v`)
    pub fn video_quality(self, quality: u32) -> Self {
        self.arg("-q:v").arg(quality.to_string())
    }

    pub fn pixel_format<S: Into<OsString>>(self, format: S) -> Self {
        self.arg("-pix_fmt").arg(format)
    }

    /// Output frame rate
    pub fn frame_rate(self, fps: u32) -> Self {
        self.arg("-r").arg(fps.to_string())
    }

    pub fn audio_codec<S: Into<OsString>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Set audio sample rate
    pub fn audio_sample_rate(self, rate: u32) -> Self {
        self.arg("-ar").arg(rate.to_string())
    }

    /// Set audio channels
    pub fn audio_channels(self, channels: u32) -> Self {
        self.arg("-ac").arg(channels.to_string())
    }

    /// Add video filter
    pub fn video_filter<S: Into<OsString>>(self, filter: S) -> Self {
        self.arg("-vf").arg(filter)
    }

    /// Run the command to completion and capture stdout and stderr.
    ///
    /// A non-zero exit is not an error here; callers inspect the status.
    /// Failing to start the process is.
    pub async fn execute(&self) -> Result<ProcessOutput> {
        debug!("Executing media processing command: {}", self);
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        Ok(ProcessOutput {
            status: output.status.code(),
            output: combined,
        })
    }

    /// Run the command to completion with stdout and stderr sent to the null
    /// device. Only the exit status is reported.
    pub async fn status(&self) -> Result<ProcessOutput> {
        debug!("Executing media processing command: {}", self);
        debug!("Description: {}", self.description);

        let status = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        Ok(ProcessOutput {
            status: status.code(),
            output: Vec::new(),
        })
    }

    fn spawn_error(&self, e: std::io::Error) -> AviconvError {
        if e.kind() == std::io::ErrorKind::NotFound {
            AviconvError::ToolNotFound(self.binary_path.clone())
        } else {
            AviconvError::Media(format!("Failed to execute {}: {}", self.binary_path, e))
        }
    }
}

impl fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary_path)?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Builder for the commands this tool runs
pub struct MediaCommandBuilder {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl MediaCommandBuilder {
    pub fn new<S1: Into<String>, S2: Into<String>>(ffmpeg_path: S1, ffprobe_path: S2) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Build the AVI conversion command for one file under `profile`
    pub fn convert<P: AsRef<Path>>(&self, profile: &Profile, input_path: P, output_path: P) -> MediaCommand {
        MediaCommand::new(&self.ffmpeg_path, format!("AVI conversion ({})", profile.name))
            .overwrite()
            .input(input_path)
            .video_codec(&profile.video_codec)
            .video_quality(profile.quality)
            .pixel_format(&profile.pixel_format)
            .frame_rate(profile.frame_rate)
            .audio_codec(&profile.audio_codec)
            .audio_sample_rate(profile.audio_sample_rate)
            .audio_channels(profile.audio_channels)
            .video_filter(profile.geometry.filter_expression())
            .output(output_path)
    }

    /// Build the probe command reading the first video stream as JSON
    pub fn probe_video<P: AsRef<Path>>(&self, path: P) -> MediaCommand {
        MediaCommand::new(&self.ffprobe_path, "Video probe")
            .args(["-v", "error", "-select_streams", "v:0"])
            .args(["-show_entries", "stream=codec_type,width,height,r_frame_rate"])
            .args(["-of", "json"])
            .output(path)
    }

    /// Build version check command
    pub fn ffmpeg_version(&self) -> MediaCommand {
        MediaCommand::new(&self.ffmpeg_path, "Version check").arg("-version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_portrait_argument_order() {
        let builder = MediaCommandBuilder::new("ffmpeg", "ffprobe");
        let cmd = builder.convert(&Profile::portrait(), Path::new("/v/in.mp4"), Path::new("/a/in.avi"));

        assert_eq!(cmd.binary_path, "ffmpeg");
        assert_eq!(
            cmd.args,
            vec![
                "-y", "-i", "/v/in.mp4",
                "-c:v", "mjpeg",
                "-q:v", "13",
                "-pix_fmt", "yuvj420p",
                "-r", "30",
                "-c:a", "pcm_s16le",
                "-ar", "22050",
                "-ac", "1",
                "-vf", "scale=284:240:force_original_aspect_ratio=increase,crop=284:240,transpose=1",
                "/a/in.avi",
            ]
        );
    }

    #[test]
    fn test_convert_square_parameters() {
        let builder = MediaCommandBuilder::new("/opt/ffmpeg", "ffprobe");
        let cmd = builder.convert(&Profile::square(), Path::new("x.mkv"), Path::new("x.avi"));

        assert_eq!(cmd.binary_path, "/opt/ffmpeg");
        let joined = cmd.to_string();
        assert!(joined.contains("-q:v 5"));
        assert!(joined.contains("-r 24"));
        assert!(joined.contains("-ar 44100"));
        assert!(joined.ends_with("crop=240:240 x.avi"));
        assert!(joined.starts_with("/opt/ffmpeg -y -i x.mkv"));
    }

    #[test]
    fn test_display_quotes_whitespace() {
        let cmd = MediaCommand::new("ffmpeg", "test")
            .input("my clip.mp4")
            .output("out.avi");
        assert_eq!(cmd.to_string(), "ffmpeg -i 'my clip.mp4' out.avi");
    }

    #[test]
    fn test_probe_command() {
        let builder = MediaCommandBuilder::new("ffmpeg", "ffprobe");
        let cmd = builder.probe_video("a.avi");
        assert_eq!(cmd.binary_path, "ffprobe");
        assert_eq!(cmd.args.last().map(|a| a.as_os_str()), Some(std::ffi::OsStr::new("a.avi")));
        assert!(cmd.args.iter().any(|a| a == "json"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_kept_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new(OsStr::from_bytes(b"/v/caf\xe9.MP4"));
        let output = Path::new(OsStr::from_bytes(b"/a/caf\xe9.avi"));
        let cmd = MediaCommandBuilder::new("ffmpeg", "ffprobe").convert(&Profile::square(), input, output);

        assert_eq!(cmd.args[2].as_os_str(), input.as_os_str());
        assert_eq!(cmd.args.last().map(|a| a.as_os_str()), Some(output.as_os_str()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_status_discards_output() {
        let cmd = MediaCommand::new("sh", "noisy exit")
            .args(["-c", "echo noise; echo more noise >&2; exit 3"]);

        let output = cmd.status().await.unwrap();
        assert_eq!(output.status, Some(3));
        assert!(output.output.is_empty());
        assert!(!output.success());
    }

    #[tokio::test]
    async fn test_status_missing_binary() {
        let cmd = MediaCommand::new("/nonexistent/aviconv-test/ffmpeg", "missing").arg("-version");
        assert!(matches!(cmd.status().await, Err(AviconvError::ToolNotFound(_))));
    }
}
