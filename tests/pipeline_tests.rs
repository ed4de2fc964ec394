//! Integration tests for the assembly pipeline.
//!
//! Tests cover:
//! - External subtitle embedding and the final merge
//! - AVI remux and E-AC-3 transcode ordering
//! - Already-clean inputs passing through untouched
//! - Per-episode failure isolation
//! - Missing-video episodes failing at merge time
//! - Scratch directory cleanup
//!
//! All external tools are replaced by a recording mock, so no ffmpeg or
//! mkvmerge binary is needed.

use episode_organizer::core::pipeline::Organizer;
use episode_organizer::models::config::Config;
use episode_organizer::models::media::{Operation, SeriesInfo};
use episode_organizer::services::{MediaProbe, MediaTools, TrackInfo, TrackKind, TrackSpec};
use episode_organizer::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

// ========== MOCK TOOLS ==========

/// One recorded tool invocation.
#[derive(Debug, Clone)]
enum Call {
    Remux {
        input: PathBuf,
        output: PathBuf,
    },
    Transcode {
        input: PathBuf,
        indices: Vec<usize>,
        bitrate: String,
    },
    Multiplex {
        base: PathBuf,
        extra: Vec<(PathBuf, Option<String>, Option<String>)>,
        output: PathBuf,
    },
}

/// Recording mock for the external tool seam.
///
/// Each mutating call writes a real (empty) output file so existence checks
/// in the pipeline behave as they would with the real tools.
#[derive(Default)]
struct MockTools {
    calls: Mutex<Vec<Call>>,
    /// Probe results keyed by file name; files not listed get a clean
    /// h264+aac probe.
    probes: HashMap<String, MediaProbe>,
    /// Base file names whose multiplex call should fail.
    fail_multiplex_for: Vec<String>,
}

impl MockTools {
    fn new() -> Self {
        Self::default()
    }

    fn with_probe(mut self, file_name: &str, probe: MediaProbe) -> Self {
        self.probes.insert(file_name.to_string(), probe);
        self
    }

    fn failing_multiplex(mut self, base_file_name: &str) -> Self {
        self.fail_multiplex_for.push(base_file_name.to_string());
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn multiplex_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Multiplex { .. }))
            .collect()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().to_string()
}

impl MediaTools for MockTools {
    fn remux(&self, input: &Path, output: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Remux {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });
        fs::write(output, b"")?;
        Ok(())
    }

    fn transcode_audio(
        &self,
        input: &Path,
        track_indices: &[usize],
        bitrate: &str,
        output: &Path,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Transcode {
            input: input.to_path_buf(),
            indices: track_indices.to_vec(),
            bitrate: bitrate.to_string(),
        });
        fs::write(output, b"")?;
        Ok(())
    }

    fn multiplex(&self, base: &Path, extra: &[TrackSpec], output: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Multiplex {
            base: base.to_path_buf(),
            extra: extra
                .iter()
                .map(|s| (s.path.clone(), s.language.clone(), s.name.clone()))
                .collect(),
            output: output.to_path_buf(),
        });

        if self.fail_multiplex_for.contains(&file_name(base)) {
            return Err(Error::tool("mkvmerge", "container is broken".to_string()));
        }

        fs::write(output, b"")?;
        Ok(())
    }

    fn probe(&self, path: &Path) -> Result<MediaProbe> {
        Ok(self
            .probes
            .get(&file_name(path))
            .cloned()
            .unwrap_or_else(clean_probe))
    }
}

// ========== TEST FIXTURES ==========

fn video_track() -> TrackInfo {
    TrackInfo {
        kind: TrackKind::Video,
        codec: "h264".to_string(),
        width: Some(1920),
        height: Some(1080),
    }
}

fn audio_track(codec: &str) -> TrackInfo {
    TrackInfo {
        kind: TrackKind::Audio,
        codec: codec.to_string(),
        width: None,
        height: None,
    }
}

/// A probe needing no normalization.
fn clean_probe() -> MediaProbe {
    MediaProbe {
        duration_secs: Some(1420.0),
        tracks: vec![video_track(), audio_track("aac")],
    }
}

/// A probe with one E-AC-3 audio track.
fn eac3_probe() -> MediaProbe {
    MediaProbe {
        duration_secs: Some(1420.0),
        tracks: vec![video_track(), audio_track("eac3")],
    }
}

fn series() -> SeriesInfo {
    SeriesInfo {
        title: "My Show".to_string(),
        year: Some(2024),
        season: 1,
        total_episodes: 12,
        release_group: None,
    }
}

/// Create a source directory with the given (relative path, size) files.
fn make_source(temp: &TempDir, files: &[(&str, usize)]) -> PathBuf {
    let source = temp.path().join("source");
    for (name, size) in files {
        let path = source.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, vec![b'x'; *size]).unwrap();
    }
    source
}

// ========== EMBEDDING AND MERGE TESTS ==========

#[test]
fn test_external_subtitle_embedded_then_merged() {
    let temp = TempDir::new().unwrap();
    let source = make_source(
        &temp,
        &[("My.Show.S01E01.mkv", 5000), ("My.Show.S01E01.CR.ass", 100)],
    );

    let config = Config::default();
    let tools = MockTools::new();
    let organizer = Organizer::new(&config, &tools, &source);

    let files = organizer.scan().unwrap();
    let mut groups = organizer.group(&files);
    let outcomes = organizer.preprocess(&mut groups).unwrap();

    let outcome = &outcomes[&1];
    assert!(outcome.succeeded);
    assert_eq!(outcome.operations, vec![Operation::EmbedTracks]);

    let summary = organizer.merge(&groups, &outcomes, &series()).unwrap();
    assert_eq!(summary.merged, 1);
    assert!(summary.all_succeeded());
    assert!(summary
        .output_dir
        .ends_with("My Show (2024)/Season 01"));

    let muxes = tools.multiplex_calls();
    assert_eq!(muxes.len(), 2);

    // First multiplex: embed the subtitle with its metadata
    let Call::Multiplex { base, extra, output } = &muxes[0] else {
        unreachable!()
    };
    assert_eq!(file_name(base), "My.Show.S01E01.mkv");
    assert_eq!(extra.len(), 1);
    assert_eq!(extra[0].1.as_deref(), Some("rus"));
    assert_eq!(extra[0].2.as_deref(), Some("CR"));
    assert_eq!(file_name(output), "ep01_embedded.mkv");

    // Second multiplex: the final merge of the embedded file, nothing extra
    let Call::Multiplex { base, extra, output } = &muxes[1] else {
        unreachable!()
    };
    assert_eq!(file_name(base), "ep01_embedded.mkv");
    assert!(extra.is_empty());
    assert_eq!(file_name(output), "My Show - S01E01.mkv");
    assert!(summary.output_dir.join("My Show - S01E01.mkv").exists());
}

#[test]
fn test_duplicate_subtitle_embedded_once() {
    let temp = TempDir::new().unwrap();
    let source = make_source(
        &temp,
        &[
            ("My.Show.S01E01.mkv", 5000),
            ("a/My.Show.S01E01.CR.ass", 100),
            ("b/My.Show.S01E01.CR.ass", 100),
            ("c/My.Show.S01E01.CR.ass", 100),
        ],
    );

    let config = Config::default();
    let tools = MockTools::new();
    let organizer = Organizer::new(&config, &tools, &source);

    let files = organizer.scan().unwrap();
    let mut groups = organizer.group(&files);
    assert_eq!(groups[&1].subtitles.len(), 1);

    organizer.preprocess(&mut groups).unwrap();

    let Call::Multiplex { extra, .. } = &tools.multiplex_calls()[0] else {
        unreachable!()
    };
    assert_eq!(extra.len(), 1);
}

// ========== NORMALIZATION TESTS ==========

#[test]
fn test_avi_with_eac3_remuxed_and_transcoded() {
    let temp = TempDir::new().unwrap();
    let source = make_source(&temp, &[("My.Show.S01E02.avi", 5000)]);

    let config = Config::default();
    let tools = MockTools::new().with_probe("ep02_remuxed.mkv", eac3_probe());
    let organizer = Organizer::new(&config, &tools, &source);

    let files = organizer.scan().unwrap();
    let mut groups = organizer.group(&files);
    let outcomes = organizer.preprocess(&mut groups).unwrap();

    let outcome = &outcomes[&2];
    assert!(outcome.succeeded);
    assert_eq!(
        outcome.operations,
        vec![Operation::Remux, Operation::AudioTranscode]
    );

    let calls = tools.calls();
    let Call::Remux { input, output } = &calls[0] else {
        unreachable!()
    };
    assert_eq!(file_name(input), "My.Show.S01E02.avi");
    assert_eq!(file_name(output), "ep02_remuxed.mkv");

    let Call::Transcode { input, indices, bitrate } = &calls[1] else {
        unreachable!()
    };
    assert_eq!(file_name(input), "ep02_remuxed.mkv");
    assert_eq!(indices, &vec![0]);
    assert_eq!(bitrate, "192k");

    // The merge must start from the transcoded file
    let summary = organizer.merge(&groups, &outcomes, &series()).unwrap();
    assert_eq!(summary.merged, 1);
    let Call::Multiplex { base, .. } = &tools.multiplex_calls()[0] else {
        unreachable!()
    };
    assert_eq!(file_name(base), "ep02_aac.mkv");
}

#[test]
fn test_clean_mkv_passes_through_untouched() {
    let temp = TempDir::new().unwrap();
    let source = make_source(&temp, &[("My.Show.S01E03.mkv", 5000)]);

    let config = Config::default();
    let tools = MockTools::new();
    let organizer = Organizer::new(&config, &tools, &source);

    let files = organizer.scan().unwrap();
    let mut groups = organizer.group(&files);
    let outcomes = organizer.preprocess(&mut groups).unwrap();

    let outcome = &outcomes[&3];
    assert!(outcome.succeeded);
    assert!(outcome.operations.is_empty());
    assert_eq!(file_name(&outcome.final_path), "My.Show.S01E03.mkv");

    // Even a no-op episode gets its authoritative final merge
    let summary = organizer.merge(&groups, &outcomes, &series()).unwrap();
    assert_eq!(summary.merged, 1);
    let Call::Multiplex { base, extra, .. } = &tools.multiplex_calls()[0] else {
        unreachable!()
    };
    assert_eq!(file_name(base), "My.Show.S01E03.mkv");
    assert!(extra.is_empty());
}

// ========== FAILURE ISOLATION TESTS ==========

#[test]
fn test_failed_episode_excluded_but_run_continues() {
    let temp = TempDir::new().unwrap();
    let source = make_source(
        &temp,
        &[
            ("My.Show.S01E01.mkv", 5000),
            ("My.Show.S01E05.mkv", 5000),
            ("My.Show.S01E05.CR.ass", 100),
        ],
    );

    let config = Config::default();
    // Embedding episode 5 fails at the mkvmerge boundary
    let tools = MockTools::new().failing_multiplex("My.Show.S01E05.mkv");
    let organizer = Organizer::new(&config, &tools, &source);

    let files = organizer.scan().unwrap();
    let mut groups = organizer.group(&files);
    let outcomes = organizer.preprocess(&mut groups).unwrap();

    assert!(outcomes[&1].succeeded);
    assert!(!outcomes[&5].succeeded);
    assert!(outcomes[&5]
        .failure_reason
        .as_deref()
        .unwrap()
        .contains("embedding failed"));

    let summary = organizer.merge(&groups, &outcomes, &series()).unwrap();
    assert_eq!(summary.merged, 1);
    assert_eq!(summary.total, 2);
    assert!(!summary.all_succeeded());
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, 5);

    // The failed episode must not leave an output file behind
    assert!(summary.output_dir.join("My Show - S01E01.mkv").exists());
    assert!(!summary.output_dir.join("My Show - S01E05.mkv").exists());
}

#[test]
fn test_missing_video_fails_at_merge_time() {
    let temp = TempDir::new().unwrap();
    let source = make_source(&temp, &[("subs/My.Show.S01E04.ass", 100)]);

    let config = Config::default();
    let tools = MockTools::new();
    let organizer = Organizer::new(&config, &tools, &source);

    let files = organizer.scan().unwrap();
    let mut groups = organizer.group(&files);
    assert_eq!(groups.len(), 1);

    // No video: preprocessing produces no outcome for the episode
    let outcomes = organizer.preprocess(&mut groups).unwrap();
    assert!(outcomes.is_empty());

    let summary = organizer.merge(&groups, &outcomes, &series()).unwrap();
    assert_eq!(summary.merged, 0);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, 4);

    // No tool was ever invoked and no output file exists
    assert!(tools.multiplex_calls().is_empty());
    assert!(!summary.output_dir.join("My Show - S01E04.mkv").exists());
}

// ========== CLEANUP TESTS ==========

#[test]
fn test_cleanup_removes_scratch_directory() {
    let temp = TempDir::new().unwrap();
    let source = make_source(&temp, &[("My.Show.S01E01.avi", 5000)]);

    let config = Config::default();
    let tools = MockTools::new();
    let organizer = Organizer::new(&config, &tools, &source);

    let files = organizer.scan().unwrap();
    let mut groups = organizer.group(&files);
    organizer.preprocess(&mut groups).unwrap();

    assert!(organizer.temp_dir().exists());
    organizer.cleanup();
    assert!(!organizer.temp_dir().exists());
}
