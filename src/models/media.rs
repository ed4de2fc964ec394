//! Media-related data models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Role a scanned file plays in an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaRole {
    Video,
    Audio,
    Subtitle,
}

impl std::fmt::Display for MediaRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaRole::Video => write!(f, "video"),
            MediaRole::Audio => write!(f, "audio"),
            MediaRole::Subtitle => write!(f, "subtitle"),
        }
    }
}

/// One classified filesystem entry.
///
/// `path` always points at the most current representation of the logical
/// track: the normalizer and embedder repoint it as they produce new files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFile {
    /// Current path of the file.
    pub path: PathBuf,
    /// File name without path (as originally scanned).
    pub filename: String,
    /// File size in bytes at scan time.
    pub size: u64,
    /// Classified role.
    pub role: MediaRole,
    /// Episode number extracted from the filename.
    pub episode_number: Option<u32>,
    /// Season number extracted from the filename.
    pub season_number: Option<u32>,
    /// Release-group label for subtitle files (used as the track name).
    pub subtitle_origin_label: Option<String>,
    /// Set on subtitle files whose (episode, label, size) triple was already seen.
    pub is_duplicate: bool,
}

/// All files belonging to one episode number.
#[derive(Debug, Clone, Default)]
pub struct EpisodeGroup {
    /// The single primary video file, if any was found.
    pub video: Option<MediaFile>,
    /// External audio tracks, in scan order.
    pub audio: Vec<MediaFile>,
    /// External non-duplicate subtitle tracks, in scan order.
    pub subtitles: Vec<MediaFile>,
}

impl EpisodeGroup {
    /// Whether any external tracks are still pending embedding.
    pub fn has_external_tracks(&self) -> bool {
        !self.audio.is_empty() || !self.subtitles.is_empty()
    }
}

/// Transformation applied during normalization/embedding. Reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// AVI container remuxed to MKV.
    Remux,
    /// E-AC-3 audio tracks transcoded to AAC.
    AudioTranscode,
    /// External audio/subtitle files folded into the container.
    EmbedTracks,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Remux => write!(f, "AVI->MKV"),
            Operation::AudioTranscode => write!(f, "EAC3->AAC"),
            Operation::EmbedTracks => write!(f, "embed tracks"),
        }
    }
}

/// Per-episode result of the normalize/embed stages.
#[derive(Debug, Clone)]
pub struct NormalizationOutcome {
    /// The file to hand to the merger.
    pub final_path: PathBuf,
    /// Transformations actually performed, in order.
    pub operations: Vec<Operation>,
    /// Whether every attempted step succeeded.
    pub succeeded: bool,
    /// Present only when `succeeded` is false.
    pub failure_reason: Option<String>,
}

impl NormalizationOutcome {
    /// An outcome for an episode that needed no work.
    pub fn unchanged(path: PathBuf) -> Self {
        Self {
            final_path: path,
            operations: Vec::new(),
            succeeded: true,
            failure_reason: None,
        }
    }

    /// Mark this outcome failed with a reason.
    pub fn fail<S: Into<String>>(&mut self, reason: S) {
        self.succeeded = false;
        self.failure_reason = Some(reason.into());
    }
}

/// Confirmed series identity used for naming the output structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub title: String,
    pub year: Option<u16>,
    pub season: u32,
    pub total_episodes: usize,
    pub release_group: Option<String>,
}

/// Validation result for one produced output file.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub file_path: PathBuf,
    pub is_valid: bool,
    /// Container duration in seconds.
    pub duration: Option<f64>,
    pub video_tracks: usize,
    pub audio_tracks: usize,
    pub subtitle_tracks: usize,
    pub video_codec: Option<String>,
    pub resolution: Option<String>,
    pub file_size_mb: Option<f64>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}
