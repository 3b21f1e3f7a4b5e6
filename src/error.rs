use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AviconvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Directory listing error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("{0} not found on PATH or at the configured location")]
    ToolNotFound(String),

    /// The transcoder ran to completion but reported failure.
    #[error("Command '{command}' returned non-zero exit status {}", status_text(.status))]
    TranscodeFailure {
        command: String,
        status: Option<i32>,
    },

    #[error("Unknown profile '{name}'. Available profiles: {available}")]
    UnknownProfile { name: String, available: String },

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

fn status_text(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, AviconvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcode_failure_message() {
        let err = AviconvError::TranscodeFailure {
            command: "ffmpeg -y -i a.mp4 a.avi".to_string(),
            status: Some(1),
        };
        assert_eq!(
            err.to_string(),
            "Command 'ffmpeg -y -i a.mp4 a.avi' returned non-zero exit status 1"
        );

        let killed = AviconvError::TranscodeFailure {
            command: "ffmpeg".to_string(),
            status: None,
        };
        assert!(killed.to_string().ends_with("unknown (terminated by signal)"));
    }
}
