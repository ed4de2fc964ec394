//! Merger module.
//!
//! The final, unconditional multiplex of an episode into the
//! library-visible output file. Runs for every non-failed episode even when
//! normalization and embedding were no-ops; this is the single authoritative
//! point that produces the output file.

use crate::core::embedder::external_track_specs;
use crate::models::config::Config;
use crate::models::media::EpisodeGroup;
use crate::services::MediaTools;
use crate::Result;
use std::path::Path;

/// Produces the final per-episode output container.
pub struct Merger<'a> {
    config: &'a Config,
    tools: &'a dyn MediaTools,
}

impl<'a> Merger<'a> {
    pub fn new(config: &'a Config, tools: &'a dyn MediaTools) -> Self {
        Self { config, tools }
    }

    /// Merge one episode's video + audio + subtitles into `output`.
    ///
    /// An episode without a video file is a hard failure, raised before any
    /// tool invocation so no partial output file is ever created.
    pub fn merge_episode(
        &self,
        episode: u32,
        group: &EpisodeGroup,
        output: &Path,
    ) -> Result<()> {
        let video = group
            .video
            .as_ref()
            .ok_or(crate::Error::MissingVideo(episode))?;

        let specs = external_track_specs(group, self.config);

        tracing::info!(
            "Episode {}: merging {} (+{} audio, +{} subtitle) -> {}",
            episode,
            video.filename,
            group.audio.len(),
            group.subtitles.len(),
            output.display()
        );

        self.tools.multiplex(&video.path, &specs, output)
    }
}
