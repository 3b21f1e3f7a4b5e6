//! aviconv - batch AVI conversion and video inspection
//!
//! Converts a directory of videos to a fixed MJPEG/PCM AVI format with ffmpeg,
//! using one named encoding profile per run, and prints basic metadata
//! (resolution, frame rate) for the videos in a directory.

pub mod cli;
pub mod config;
pub mod convert;
pub mod discovery;
pub mod error;
pub mod inspect;
pub mod media;
pub mod profile;
