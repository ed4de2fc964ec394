//! Per-directory assembly pipeline.
//!
//! Wires the stages together for one source directory: scan, group,
//! normalize/embed, merge, validate, cleanup. Episodes are processed
//! sequentially; a failed episode is excluded from the merge pass and the
//! run continues.

use crate::core::classifier;
use crate::core::embedder::TrackEmbedder;
use crate::core::grouper;
use crate::core::merger::Merger;
use crate::core::normalizer::Normalizer;
use crate::core::validator::OutputValidator;
use crate::generators::{filename, folder};
use crate::models::config::Config;
use crate::models::media::{
    EpisodeGroup, MediaFile, NormalizationOutcome, Operation, SeriesInfo,
};
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Result of the merge pass over one directory.
#[derive(Debug)]
pub struct MergeSummary {
    /// Directory the merged episodes were written to.
    pub output_dir: PathBuf,
    /// Episodes merged successfully.
    pub merged: usize,
    /// Episodes known to this run.
    pub total: usize,
    /// Failed episodes with their reasons.
    pub failed: Vec<(u32, String)>,
}

impl MergeSummary {
    pub fn all_succeeded(&self) -> bool {
        self.merged == self.total
    }
}

/// Assembles one source directory into the output library layout.
pub struct Organizer<'a> {
    config: &'a Config,
    tools: &'a dyn crate::services::MediaTools,
    source: PathBuf,
    temp_dir: PathBuf,
}

impl<'a> Organizer<'a> {
    pub fn new(
        config: &'a Config,
        tools: &'a dyn crate::services::MediaTools,
        source: &Path,
    ) -> Self {
        let temp_dir = source.join(&config.temp_dir_name);
        Self {
            config,
            tools,
            source: source.to_path_buf(),
            temp_dir,
        }
    }

    /// Scan and classify the source directory.
    pub fn scan(&self) -> Result<Vec<MediaFile>> {
        classifier::scan_directory(&self.source, self.config)
    }

    /// Group classified files by episode.
    pub fn group(&self, files: &[MediaFile]) -> BTreeMap<u32, EpisodeGroup> {
        grouper::group_files(files)
    }

    /// Run the normalizer and embedder over every episode.
    ///
    /// Episodes without a video file produce no outcome here; the merge
    /// pass reports them. A failed step marks the episode's outcome failed
    /// and the episode keeps its pre-failure state.
    pub fn preprocess(
        &self,
        groups: &mut BTreeMap<u32, EpisodeGroup>,
    ) -> Result<BTreeMap<u32, NormalizationOutcome>> {
        std::fs::create_dir_all(&self.temp_dir)?;

        let normalizer = Normalizer::new(self.config, self.tools, &self.temp_dir);
        let embedder = TrackEmbedder::new(self.config, self.tools, &self.temp_dir);

        let mut outcomes = BTreeMap::new();

        for (&episode, group) in groups.iter_mut() {
            let mut outcome = match normalizer.normalize_episode(episode, group) {
                Some(outcome) => outcome,
                None => continue, // no video; the merger reports it
            };

            if outcome.succeeded {
                match embedder.embed_episode(episode, group) {
                    Ok(true) => {
                        outcome.operations.push(Operation::EmbedTracks);
                        if let Some(ref video) = group.video {
                            outcome.final_path = video.path.clone();
                        }
                    }
                    Ok(false) => {}
                    Err(e) => outcome.fail(format!("embedding failed: {}", e)),
                }
            }

            if outcome.succeeded {
                if outcome.operations.is_empty() {
                    tracing::debug!("Episode {}: no preprocessing needed", episode);
                } else {
                    let applied: Vec<String> =
                        outcome.operations.iter().map(|o| o.to_string()).collect();
                    tracing::info!("Episode {}: applied {}", episode, applied.join(", "));
                }
            } else {
                tracing::error!(
                    "Episode {} preprocessing failed: {}",
                    episode,
                    outcome.failure_reason.as_deref().unwrap_or("unknown")
                );
            }

            outcomes.insert(episode, outcome);
        }

        Ok(outcomes)
    }

    /// Compute the output directory for a confirmed series identity.
    pub fn output_dir(&self, series: &SeriesInfo) -> PathBuf {
        let parent = self.source.parent().unwrap_or(&self.source);
        folder::output_dir(parent, series)
    }

    /// Merge every non-failed episode into the output structure.
    pub fn merge(
        &self,
        groups: &BTreeMap<u32, EpisodeGroup>,
        outcomes: &BTreeMap<u32, NormalizationOutcome>,
        series: &SeriesInfo,
    ) -> Result<MergeSummary> {
        let output_dir = self.output_dir(series);
        std::fs::create_dir_all(&output_dir)?;

        let merger = Merger::new(self.config, self.tools);

        let pb = ProgressBar::new(groups.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        let mut summary = MergeSummary {
            output_dir: output_dir.clone(),
            merged: 0,
            total: groups.len(),
            failed: Vec::new(),
        };

        for (&episode, group) in groups {
            let output_file = output_dir.join(filename::episode_filename(series, episode));
            pb.set_message(format!("Merging episode {:02}", episode));
            pb.inc(1);

            if let Some(outcome) = outcomes.get(&episode) {
                if !outcome.succeeded {
                    let reason = outcome
                        .failure_reason
                        .clone()
                        .unwrap_or_else(|| "preprocessing failed".to_string());
                    summary.failed.push((episode, reason));
                    continue;
                }
            }

            match merger.merge_episode(episode, group, &output_file) {
                Ok(()) => summary.merged += 1,
                Err(e) => {
                    tracing::error!("Episode {} merge failed: {}", episode, e);
                    summary.failed.push((episode, e.to_string()));
                }
            }
        }

        pb.finish_and_clear();
        Ok(summary)
    }

    /// Validate the produced output files. Returns (valid, invalid) counts.
    pub fn validate(&self, output_dir: &Path) -> Result<(usize, usize)> {
        OutputValidator::new(self.config, self.tools).validate_directory(output_dir)
    }

    /// Remove the scratch directory, best effort.
    ///
    /// Locked or undeletable entries are logged and skipped, never fatal.
    pub fn cleanup(&self) {
        if !self.temp_dir.exists() {
            return;
        }
        let report = crate::utils::fs::remove_dir_best_effort(&self.temp_dir);
        if report.failed.is_empty() {
            tracing::info!("Removed scratch directory {}", self.temp_dir.display());
        } else {
            tracing::warn!(
                "Scratch cleanup left {} entr(ies) behind under {}",
                report.failed.len(),
                self.temp_dir.display()
            );
        }
    }

    /// Scratch directory used by this run.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }
}
