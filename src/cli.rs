use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Path to the ffmpeg binary
    #[arg(long, global = true)]
    pub ffmpeg: Option<String>,

    /// Path to the ffprobe binary
    #[arg(long, global = true)]
    pub ffprobe: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert every video in the input directory to MJPEG/PCM AVI
    Convert {
        /// Named profile to encode with (see `aviconv profiles`)
        #[arg(short, long)]
        profile: Option<String>,

        /// Directory the input and output directories are relative to
        /// (default: the directory holding this executable)
        #[arg(short, long)]
        base_dir: Option<PathBuf>,

        /// Input directory (default: videos)
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        /// Output directory (default: avi)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the ffmpeg command for each file without running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print resolution and frame rate of the videos in a directory
    Inspect {
        /// Directory to scan (default: videos, relative to the working directory)
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        /// File extension to select (case-sensitive, default: avi)
        #[arg(short, long)]
        extension: Option<String>,
    },

    /// List the available encoding profiles
    Profiles,

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = "aviconv.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
