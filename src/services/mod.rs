//! External tool services.
//!
//! The pipeline depends on four capabilities with fixed contracts: container
//! remux, audio transcode, multiplex, and metadata probe. `MediaTools`
//! abstracts them so tests can substitute a mock; `SystemTools` is the real
//! implementation shelling out to ffmpeg/mkvmerge/ffprobe.

pub mod ffmpeg;
pub mod ffprobe;
pub mod mkvmerge;
pub mod recognizer;

pub use ffprobe::{MediaProbe, TrackInfo, TrackKind};

use crate::Result;
use std::path::{Path, PathBuf};

/// One extra track handed to the multiplex capability.
#[derive(Debug, Clone)]
pub struct TrackSpec {
    pub path: PathBuf,
    /// ISO 639-2 language tag for the track, if known.
    pub language: Option<String>,
    /// Display name for the track, if known.
    pub name: Option<String>,
}

impl TrackSpec {
    /// A plain track with no metadata (external audio files).
    pub fn plain(path: PathBuf) -> Self {
        Self {
            path,
            language: None,
            name: None,
        }
    }
}

/// The external capabilities the pipeline is built on.
///
/// All calls are synchronous and blocking; a failure is reported as
/// `Error::ToolFailed` with the tool's diagnostic output.
pub trait MediaTools: Send + Sync {
    /// Repackage `input` into an MKV container at `output`, stream-copying
    /// every stream (no re-encode).
    fn remux(&self, input: &Path, output: &Path) -> Result<()>;

    /// Re-encode the audio tracks at `track_indices` (0-based among audio
    /// tracks) to AAC at `bitrate`, stream-copying everything else.
    fn transcode_audio(
        &self,
        input: &Path,
        track_indices: &[usize],
        bitrate: &str,
        output: &Path,
    ) -> Result<()>;

    /// Combine `base` plus every `extra` track, in order, into one container
    /// at `output`, applying per-track language/name metadata.
    fn multiplex(&self, base: &Path, extra: &[TrackSpec], output: &Path) -> Result<()>;

    /// Parse container metadata: track list and duration.
    fn probe(&self, path: &Path) -> Result<MediaProbe>;
}

/// Real implementation backed by ffmpeg, mkvmerge and ffprobe.
#[derive(Debug, Default)]
pub struct SystemTools;

impl SystemTools {
    pub fn new() -> Self {
        Self
    }
}

impl MediaTools for SystemTools {
    fn remux(&self, input: &Path, output: &Path) -> Result<()> {
        ffmpeg::remux(input, output)
    }

    fn transcode_audio(
        &self,
        input: &Path,
        track_indices: &[usize],
        bitrate: &str,
        output: &Path,
    ) -> Result<()> {
        ffmpeg::transcode_audio(input, track_indices, bitrate, output)
    }

    fn multiplex(&self, base: &Path, extra: &[TrackSpec], output: &Path) -> Result<()> {
        mkvmerge::multiplex(base, extra, output)
    }

    fn probe(&self, path: &Path) -> Result<MediaProbe> {
        ffprobe::probe(path)
    }
}
