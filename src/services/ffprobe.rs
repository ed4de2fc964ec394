//! FFprobe service for extracting container metadata.

use crate::Result;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// FFprobe output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

/// FFprobe stream information.
#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// FFprobe format information.
#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Kind of a probed track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
    Other,
}

/// One probed track.
#[derive(Debug, Clone)]
pub struct TrackInfo {
    pub kind: TrackKind,
    /// Codec name as reported by ffprobe (e.g. "h264", "eac3", "aac").
    pub codec: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Probed container metadata.
#[derive(Debug, Clone, Default)]
pub struct MediaProbe {
    /// Container duration in seconds, when reported.
    pub duration_secs: Option<f64>,
    pub tracks: Vec<TrackInfo>,
}

impl MediaProbe {
    pub fn video_track_count(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.kind == TrackKind::Video)
            .count()
    }

    pub fn audio_track_count(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.kind == TrackKind::Audio)
            .count()
    }

    pub fn subtitle_track_count(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.kind == TrackKind::Subtitle)
            .count()
    }

    /// First video track, if any.
    pub fn video_track(&self) -> Option<&TrackInfo> {
        self.tracks.iter().find(|t| t.kind == TrackKind::Video)
    }

    /// Indices of E-AC-3 audio tracks, 0-based among audio tracks only
    /// (the index space ffmpeg's `a:N` stream specifiers use).
    pub fn eac3_audio_indices(&self) -> Vec<usize> {
        self.tracks
            .iter()
            .filter(|t| t.kind == TrackKind::Audio)
            .enumerate()
            .filter(|(_, t)| is_eac3(&t.codec))
            .map(|(i, _)| i)
            .collect()
    }
}

/// E-AC-3 shows up as "eac3", "E-AC-3" or "A_EAC3" depending on the muxer.
pub fn is_eac3(codec: &str) -> bool {
    let upper = codec.to_uppercase().replace('-', "");
    upper.contains("EAC3")
}

/// Check if ffprobe is installed.
pub fn is_installed() -> bool {
    Command::new("ffprobe")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get ffprobe version.
pub fn get_version() -> Result<String> {
    let output = Command::new("ffprobe").arg("-version").output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next().unwrap_or("unknown");

    Ok(first_line.to_string())
}

/// Probe a media file for its track list and duration.
pub fn probe(path: &Path) -> Result<MediaProbe> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(crate::Error::ProbeFailed(path.display().to_string()));
    }

    let ffprobe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;

    let duration_secs = ffprobe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|d| d.parse().ok());

    let tracks = ffprobe
        .streams
        .iter()
        .map(|s| TrackInfo {
            kind: match s.codec_type.as_str() {
                "video" => TrackKind::Video,
                "audio" => TrackKind::Audio,
                "subtitle" => TrackKind::Subtitle,
                _ => TrackKind::Other,
            },
            codec: s.codec_name.clone().unwrap_or_else(|| "unknown".to_string()),
            width: s.width,
            height: s.height,
        })
        .collect();

    Ok(MediaProbe {
        duration_secs,
        tracks,
    })
}
