//! Output validator module.
//!
//! Re-inspects every produced output file and reports pass/fail. Purely
//! diagnostic: nothing is mutated or deleted.

use crate::models::config::Config;
use crate::models::media::ValidationReport;
use crate::services::MediaTools;
use crate::Result;
use colored::Colorize;
use std::path::Path;

/// Validates produced MKV files against the library's expectations.
pub struct OutputValidator<'a> {
    config: &'a Config,
    tools: &'a dyn MediaTools,
}

impl<'a> OutputValidator<'a> {
    pub fn new(config: &'a Config, tools: &'a dyn MediaTools) -> Self {
        Self { config, tools }
    }

    /// Validate a single output file.
    ///
    /// Errors (file invalid): no video track, missing or too-short duration.
    /// Warnings (file still valid): multiple video tracks, no audio tracks.
    pub fn validate_file(&self, path: &Path) -> ValidationReport {
        let mut report = ValidationReport {
            file_path: path.to_path_buf(),
            ..Default::default()
        };

        report.file_size_mb = std::fs::metadata(path)
            .ok()
            .map(|m| m.len() as f64 / (1024.0 * 1024.0));

        let probe = match self.tools.probe(path) {
            Ok(probe) => probe,
            Err(e) => {
                report.errors.push(format!("probe failed: {}", e));
                return report;
            }
        };

        report.duration = probe.duration_secs;
        report.video_tracks = probe.video_track_count();
        report.audio_tracks = probe.audio_track_count();
        report.subtitle_tracks = probe.subtitle_track_count();

        if let Some(video) = probe.video_track() {
            report.video_codec = Some(video.codec.clone());
            if let (Some(w), Some(h)) = (video.width, video.height) {
                report.resolution = Some(format!("{}x{}", w, h));
            }
        }

        if report.video_tracks == 0 {
            report.errors.push("no video track".to_string());
        } else if report.video_tracks > 1 {
            report
                .warnings
                .push(format!("multiple video tracks: {}", report.video_tracks));
        }

        if report.audio_tracks == 0 {
            report.warnings.push("no audio tracks".to_string());
        }

        match report.duration {
            Some(d) if d >= self.config.min_duration_secs => {}
            Some(d) => report.errors.push(format!("video too short: {:.1}s", d)),
            None => report.errors.push("duration not reported".to_string()),
        }

        report.is_valid = report.errors.is_empty();
        report
    }

    /// Validate every MKV file in a directory, printing a per-file report.
    ///
    /// Returns (valid, invalid) counts.
    pub fn validate_directory(&self, output_dir: &Path) -> Result<(usize, usize)> {
        println!();
        println!("{}", "[Validation]".bold().cyan());

        let mut mkv_files: Vec<_> = std::fs::read_dir(output_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                crate::utils::fs::get_extension(p).is_some_and(|ext| ext == "mkv")
            })
            .collect();
        mkv_files.sort();

        if mkv_files.is_empty() {
            println!("  No MKV files found in {}", output_dir.display());
            return Ok((0, 0));
        }

        let mut valid = 0;
        let mut invalid = 0;

        for file in &mkv_files {
            let report = self.validate_file(file);
            print_report(&report);

            if report.is_valid {
                valid += 1;
            } else {
                invalid += 1;
            }
        }

        println!();
        println!("{}", "[Validation Summary]".bold());
        println!("  {} {}", "Valid:".bold(), valid.to_string().green());
        println!(
            "  {} {}",
            "Invalid:".bold(),
            if invalid > 0 {
                invalid.to_string().red()
            } else {
                invalid.to_string().normal()
            }
        );

        Ok((valid, invalid))
    }
}

/// Print one file's validation report.
fn print_report(report: &ValidationReport) {
    let status = if report.is_valid {
        "[OK]".green()
    } else {
        "[BAD]".red()
    };
    let name = report
        .file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    println!();
    println!("{} {}", status, name.bold());

    if let Some(size) = report.file_size_mb {
        println!("  size: {:.1} MB", size);
    }
    if let Some(duration) = report.duration {
        println!("  duration: {}m {}s", duration as u64 / 60, duration as u64 % 60);
    }

    let codec = report.video_codec.as_deref().unwrap_or("?");
    let resolution = report.resolution.as_deref().unwrap_or("?");
    println!(
        "  video: {} [{} {}], audio: {}, subtitles: {}",
        report.video_tracks, codec, resolution, report.audio_tracks, report.subtitle_tracks
    );

    for error in &report.errors {
        println!("  {} {}", "error:".red(), error);
    }
    for warning in &report.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
}
