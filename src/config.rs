use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AviconvError, Result};
use crate::profile::{self, Profile};

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_convert_extensions() -> Vec<String> {
    ["mp4", "avi", "mov", "mkv"].iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub inspect: InspectConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Extra or replacement profiles, merged over the built-in ones by name
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg_path: String,
    /// Path to ffprobe binary
    #[serde(default = "default_ffprobe")]
    pub ffprobe_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Input directory, relative to the base directory unless absolute
    pub input_dir: PathBuf,
    /// Output directory, relative to the base directory unless absolute
    pub output_dir: PathBuf,
    /// Base directory for relative paths. Defaults to the executable's directory.
    pub base_dir: Option<PathBuf>,
    /// Extensions selected for conversion, matched case-insensitively
    pub extensions: Vec<String>,
    /// Profile used when `--profile` is not given
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Input directory, relative to the working directory unless absolute
    pub input_dir: PathBuf,
    /// Extension selected for inspection, matched case-sensitively
    pub extension: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the daily rolling log file; console only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
            ffprobe_path: default_ffprobe(),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("videos"),
            output_dir: PathBuf::from("avi"),
            base_dir: None,
            extensions: default_convert_extensions(),
            profile: None,
        }
    }
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("videos"),
            extension: "avi".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AviconvError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AviconvError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AviconvError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Built-in profiles with any config-file profiles merged in
    pub fn profiles(&self) -> Vec<Profile> {
        profile::merge_profiles(&self.profiles)
    }

    /// Resolve the profile to run with. Either the caller or the config file
    /// must name one.
    pub fn select_profile(&self, requested: Option<&str>) -> Result<Profile> {
        let profiles = self.profiles();
        let name = requested
            .or(self.convert.profile.as_deref())
            .ok_or_else(|| {
                AviconvError::Config(format!(
                    "No profile selected. Pass --profile or set convert.profile (available: {})",
                    profile::profile_names(&profiles)
                ))
            })?;

        profile::find_profile(&profiles, name).cloned()
    }

    /// Base directory for the converter's relative paths
    pub fn convert_base_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.convert.base_dir {
            return Ok(dir.clone());
        }

        let exe = std::env::current_exe()?;
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| AviconvError::Config("Cannot determine executable directory".to_string()))
    }

    /// Converter (input, output) directories, resolved against the base directory
    pub fn convert_dirs(&self) -> Result<(PathBuf, PathBuf)> {
        let base = self.convert_base_dir()?;
        Ok((
            resolve(&base, &self.convert.input_dir),
            resolve(&base, &self.convert.output_dir),
        ))
    }
}

/// Join `path` onto `base` unless it is already absolute
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
