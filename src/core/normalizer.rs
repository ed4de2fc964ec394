//! Format normalizer module.
//!
//! Brings an episode's primary video file into the canonical container
//! (MKV) and replaces E-AC-3 audio tracks with AAC. Both sub-operations
//! write fresh files into the scratch directory; the source file is never
//! mutated in place. On success the episode group's video reference is
//! repointed at the newest representation.

use crate::models::config::Config;
use crate::models::media::{EpisodeGroup, NormalizationOutcome, Operation};
use crate::services::MediaTools;
use std::path::{Path, PathBuf};

/// Coordinates the remux and audio-normalization steps for one episode.
pub struct Normalizer<'a> {
    config: &'a Config,
    tools: &'a dyn MediaTools,
    temp_dir: &'a Path,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a Config, tools: &'a dyn MediaTools, temp_dir: &'a Path) -> Self {
        Self {
            config,
            tools,
            temp_dir,
        }
    }

    /// Normalize one episode's video file in place.
    ///
    /// Returns `None` when the group has no video file (valid here, caught
    /// at merge time). A failed step marks the outcome failed and stops;
    /// the prior file reference is retained and the step's partial output
    /// is removed.
    pub fn normalize_episode(
        &self,
        episode: u32,
        group: &mut EpisodeGroup,
    ) -> Option<NormalizationOutcome> {
        let video = group.video.as_mut()?;

        let mut current = video.path.clone();
        let mut outcome = NormalizationOutcome::unchanged(current.clone());

        // 1. Container remux (AVI only)
        if needs_remux(&current) {
            let target = self.temp_path(episode, "remuxed");
            tracing::info!("Episode {}: remuxing {} to MKV", episode, video.filename);

            match self.tools.remux(&current, &target) {
                Ok(()) => {
                    current = target;
                    outcome.operations.push(Operation::Remux);
                }
                Err(e) => {
                    discard_partial(&target);
                    outcome.fail(format!("remux failed: {}", e));
                    return Some(outcome);
                }
            }
        }

        // 2. Audio-codec normalization (E-AC-3 -> AAC)
        let probe = match self.tools.probe(&current) {
            Ok(probe) => probe,
            Err(e) => {
                outcome.fail(format!("probe failed: {}", e));
                return Some(outcome);
            }
        };

        let eac3_indices = probe.eac3_audio_indices();
        if !eac3_indices.is_empty() {
            let target = self.temp_path(episode, "aac");
            tracing::info!(
                "Episode {}: converting {} E-AC-3 track(s) to AAC",
                episode,
                eac3_indices.len()
            );

            match self.tools.transcode_audio(
                &current,
                &eac3_indices,
                &self.config.aac_bitrate,
                &target,
            ) {
                Ok(()) => {
                    current = target;
                    outcome.operations.push(Operation::AudioTranscode);
                }
                Err(e) => {
                    discard_partial(&target);
                    outcome.fail(format!("audio transcode failed: {}", e));
                    return Some(outcome);
                }
            }
        }

        // Repoint the group at the newest representation
        video.path = current.clone();
        outcome.final_path = current;
        Some(outcome)
    }

    fn temp_path(&self, episode: u32, suffix: &str) -> PathBuf {
        self.temp_dir
            .join(format!("ep{:02}_{}.mkv", episode, suffix))
    }
}

/// Only the legacy AVI container needs a remux.
pub fn needs_remux(path: &Path) -> bool {
    crate::utils::fs::get_extension(path).is_some_and(|ext| ext == "avi")
}

/// Remove a failed step's partial output, best effort.
fn discard_partial(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Could not remove partial file {}: {}", path.display(), e);
        }
    }
}
