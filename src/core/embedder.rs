//! Track embedder module.
//!
//! Folds an episode's still-pending external audio and subtitle files into
//! its video container as additional tracks.

use crate::models::config::Config;
use crate::models::media::EpisodeGroup;
use crate::services::{MediaTools, TrackSpec};
use crate::Result;
use std::path::Path;

/// Embeds external tracks into an episode's video file.
pub struct TrackEmbedder<'a> {
    config: &'a Config,
    tools: &'a dyn MediaTools,
    temp_dir: &'a Path,
}

impl<'a> TrackEmbedder<'a> {
    pub fn new(config: &'a Config, tools: &'a dyn MediaTools, temp_dir: &'a Path) -> Self {
        Self {
            config,
            tools,
            temp_dir,
        }
    }

    /// Embed all pending external tracks for one episode.
    ///
    /// No-op (returns `Ok(false)`) when both lists are empty. On success the
    /// group's video reference is repointed at the embedded file and both
    /// lists are cleared, so the merger will not re-add them. On failure the
    /// group is left untouched and no partial embed is referenced.
    pub fn embed_episode(&self, episode: u32, group: &mut EpisodeGroup) -> Result<bool> {
        if !group.has_external_tracks() {
            return Ok(false);
        }

        let video = group
            .video
            .as_ref()
            .ok_or(crate::Error::MissingVideo(episode))?;

        let specs = external_track_specs(group, self.config);
        let target = self
            .temp_dir
            .join(format!("ep{:02}_embedded.mkv", episode));

        tracing::info!(
            "Episode {}: embedding {} audio and {} subtitle track(s)",
            episode,
            group.audio.len(),
            group.subtitles.len()
        );

        if let Err(e) = self.tools.multiplex(&video.path, &specs, &target) {
            if target.exists() {
                if let Err(rm) = std::fs::remove_file(&target) {
                    tracing::warn!(
                        "Could not remove partial embed {}: {}",
                        target.display(),
                        rm
                    );
                }
            }
            return Err(e);
        }

        let video = group.video.as_mut().expect("checked above");
        video.path = target;
        group.audio.clear();
        group.subtitles.clear();

        Ok(true)
    }
}

/// Build the ordered extra-track list for an episode: audio first, then
/// subtitles carrying language and display-name metadata.
pub fn external_track_specs(group: &EpisodeGroup, config: &Config) -> Vec<TrackSpec> {
    let mut specs = Vec::with_capacity(group.audio.len() + group.subtitles.len());

    for audio in &group.audio {
        specs.push(TrackSpec::plain(audio.path.clone()));
    }

    for sub in &group.subtitles {
        let name = sub
            .subtitle_origin_label
            .clone()
            .unwrap_or_else(|| config.default_subtitle_name.clone());
        specs.push(TrackSpec {
            path: sub.path.clone(),
            language: Some(config.subtitle_language.clone()),
            name: Some(name),
        });
    }

    specs
}
