use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AviconvError, Result};

/// Rotation applied after the scale and crop steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// 90 degrees clockwise
    Clockwise,
    /// 90 degrees counter-clockwise
    CounterClockwise,
    /// 180 degrees
    Flip,
}

impl Rotation {
    fn filter(self) -> &'static str {
        match self {
            Rotation::Clockwise => "transpose=1",
            Rotation::CounterClockwise => "transpose=2",
            Rotation::Flip => "transpose=1,transpose=1",
        }
    }
}

/// Fixed output frame geometry: scale to cover, crop to size, then rotate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub rotate: Option<Rotation>,
}

impl Geometry {
    /// ffmpeg `-vf` expression for this geometry
    pub fn filter_expression(&self) -> String {
        let mut expr = format!(
            "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}",
            w = self.width,
            h = self.height
        );
        if let Some(rotation) = self.rotate {
            expr.push(',');
            expr.push_str(rotation.filter());
        }
        expr
    }
}

/// A named, fixed set of transcoding parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Free-form note shown by `aviconv profiles`
    #[serde(default)]
    pub description: String,
    /// ffmpeg video encoder (e.g. mjpeg)
    pub video_codec: String,
    /// `-q:v` value, lower is better (2-31 for mjpeg)
    pub quality: u32,
    /// e.g. yuvj420p (planar YUV 4:2:0, full range)
    pub pixel_format: String,
    pub frame_rate: u32,
    /// ffmpeg audio encoder (e.g. pcm_s16le)
    pub audio_codec: String,
    pub audio_sample_rate: u32,
    pub audio_channels: u32,
    pub geometry: Geometry,
}

impl Profile {
    /// 284x240 at 30fps rotated for a portrait panel, 22.05kHz mono audio
    pub fn portrait() -> Self {
        Self {
            name: "portrait".to_string(),
            description: "284x240 crop rotated 90° clockwise, 30fps, q13, 22050Hz mono".to_string(),
            video_codec: "mjpeg".to_string(),
            quality: 13,
            pixel_format: "yuvj420p".to_string(),
            frame_rate: 30,
            audio_codec: "pcm_s16le".to_string(),
            audio_sample_rate: 22050,
            audio_channels: 1,
            geometry: Geometry {
                width: 284,
                height: 240,
                rotate: Some(Rotation::Clockwise),
            },
        }
    }

    /// 240x240 at 24fps, 44.1kHz mono audio
    pub fn square() -> Self {
        Self {
            name: "square".to_string(),
            description: "240x240 crop, 24fps, q5, 44100Hz mono".to_string(),
            video_codec: "mjpeg".to_string(),
            quality: 5,
            pixel_format: "yuvj420p".to_string(),
            frame_rate: 24,
            audio_codec: "pcm_s16le".to_string(),
            audio_sample_rate: 44100,
            audio_channels: 1,
            geometry: Geometry {
                width: 240,
                height: 240,
                rotate: None,
            },
        }
    }

    pub fn builtin() -> Vec<Profile> {
        vec![Self::portrait(), Self::square()]
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} q{} {} {}fps, {} {}Hz {}ch, vf={}",
            self.name,
            self.video_codec,
            self.quality,
            self.pixel_format,
            self.frame_rate,
            self.audio_codec,
            self.audio_sample_rate,
            self.audio_channels,
            self.geometry.filter_expression()
        )
    }
}

/// Merge user profiles over the built-ins; same name replaces.
pub fn merge_profiles(overrides: &[Profile]) -> Vec<Profile> {
    let mut profiles = Profile::builtin();
    for custom in overrides {
        match profiles.iter_mut().find(|p| p.name == custom.name) {
            Some(existing) => *existing = custom.clone(),
            None => profiles.push(custom.clone()),
        }
    }
    profiles
}

/// Look up a profile by name (case-insensitive)
pub fn find_profile<'a>(profiles: &'a [Profile], name: &str) -> Result<&'a Profile> {
    profiles
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| AviconvError::UnknownProfile {
            name: name.to_string(),
            available: profile_names(profiles),
        })
}

pub fn profile_names(profiles: &[Profile]) -> String {
    profiles
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_geometry_rotates() {
        assert_eq!(
            Profile::portrait().geometry.filter_expression(),
            "scale=284:240:force_original_aspect_ratio=increase,crop=284:240,transpose=1"
        );
    }

    #[test]
    fn test_square_geometry_no_rotation() {
        assert_eq!(
            Profile::square().geometry.filter_expression(),
            "scale=240:240:force_original_aspect_ratio=increase,crop=240:240"
        );
    }

    #[test]
    fn test_flip_rotation() {
        let geometry = Geometry {
            width: 320,
            height: 200,
            rotate: Some(Rotation::Flip),
        };
        assert!(geometry.filter_expression().ends_with("crop=320:200,transpose=1,transpose=1"));
    }

    #[test]
    fn test_builtin_shared_parameters() {
        for profile in Profile::builtin() {
            assert_eq!(profile.video_codec, "mjpeg");
            assert_eq!(profile.pixel_format, "yuvj420p");
            assert_eq!(profile.audio_codec, "pcm_s16le");
            assert_eq!(profile.audio_channels, 1);
        }
    }

    #[test]
    fn test_merge_replaces_and_appends() {
        let mut custom_square = Profile::square();
        custom_square.quality = 8;
        let mut wide = Profile::square();
        wide.name = "wide".to_string();
        wide.geometry.width = 320;

        let merged = merge_profiles(&[custom_square, wide]);
        assert_eq!(merged.len(), 3);
        assert_eq!(find_profile(&merged, "square").unwrap().quality, 8);
        assert_eq!(find_profile(&merged, "WIDE").unwrap().geometry.width, 320);
    }

    #[test]
    fn test_unknown_profile_lists_names() {
        let err = find_profile(&Profile::builtin(), "hd").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown profile 'hd'. Available profiles: portrait, square"
        );
    }
}
