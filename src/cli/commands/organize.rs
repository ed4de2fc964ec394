//! Organize command implementation.
//!
//! Drives the full per-directory pipeline: hint parsing, scan, grouping,
//! preprocessing, series recognition and confirmation, merging, validation,
//! and cleanup. A failure in one directory never aborts the batch.

use crate::core::parser::{self, DirNameHints};
use crate::core::pipeline::Organizer;
use crate::models::config::Config;
use crate::models::media::{EpisodeGroup, SeriesInfo};
use crate::services::recognizer::{self, Recognizer, SeriesGuess};
use crate::services::SystemTools;
use crate::Result;
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Result of processing one source directory.
struct DirectoryOutcome {
    merged: usize,
    total: usize,
}

/// Organize one or more comma-separated source directories.
pub async fn organize(
    sources: &str,
    yes: bool,
    delete_source: bool,
    config: &Config,
) -> Result<()> {
    let dirs: Vec<&str> = sources
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let mut processed = 0;
    let mut failed_dirs = 0;

    for dir in &dirs {
        println!();
        println!("{}", format!("=== {} ===", dir).bold().cyan());

        match process_directory(Path::new(dir), yes, delete_source, config).await {
            Ok(outcome) => {
                processed += 1;
                if outcome.merged < outcome.total {
                    failed_dirs += 1;
                }
            }
            Err(e) => {
                tracing::error!("Directory {} failed: {}", dir, e);
                println!("{} {}", "[FAIL]".red(), e);
                failed_dirs += 1;
            }
        }
    }

    if dirs.len() > 1 {
        println!();
        println!("{}", "[Batch Summary]".bold());
        println!("  {} {}", "Directories processed:".bold(), processed);
        println!("  {} {}", "Directories with failures:".bold(), failed_dirs);
    }

    Ok(())
}

/// Process a single source directory end to end.
async fn process_directory(
    source: &Path,
    yes: bool,
    delete_source: bool,
    config: &Config,
) -> Result<DirectoryOutcome> {
    let dirname = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let hints = parser::parse_directory_name(&dirname);
    if let Some(ref title) = hints.title {
        tracing::info!(
            "Directory hints: {} (season {:?}, group {:?})",
            title,
            hints.season,
            hints.release_group
        );
    }

    let tools = SystemTools::new();
    let organizer = Organizer::new(config, &tools, source);

    let files = organizer.scan()?;
    if files.is_empty() {
        println!("No media files found.");
        return Ok(DirectoryOutcome {
            merged: 0,
            total: 0,
        });
    }

    let mut groups = organizer.group(&files);
    if groups.is_empty() {
        println!("No files carried an episode number; nothing to organize.");
        return Ok(DirectoryOutcome {
            merged: 0,
            total: 0,
        });
    }

    // Series identity: oracle when reachable, directory hints otherwise
    let recognizer = Recognizer::new();
    let guess = match recognizer.analyze(&files, &hints, &dirname).await {
        Ok(guess) => guess,
        Err(e) => {
            tracing::warn!("Recognition unavailable, using directory hints: {}", e);
            recognizer::fallback_guess(&hints, &files)
        }
    };

    let series = confirm_series_info(guess, &hints, groups.len(), yes)?;
    show_plan(&groups, &series);

    if !yes && !prompt_yes("Start processing? (y/n): ")? {
        println!("Cancelled.");
        return Ok(DirectoryOutcome {
            merged: 0,
            total: groups.len(),
        });
    }

    let outcomes = organizer.preprocess(&mut groups)?;
    let summary = organizer.merge(&groups, &outcomes, &series)?;

    if summary.merged > 0 {
        organizer.validate(&summary.output_dir)?;
    }

    organizer.cleanup();

    println!();
    println!(
        "{} {}/{} episodes succeeded -> {}",
        "[Done]".bold().green(),
        summary.merged,
        summary.total,
        summary.output_dir.display()
    );
    for (episode, reason) in &summary.failed {
        println!("  {} episode {:02}: {}", "failed".red(), episode, reason);
    }

    if delete_source && summary.all_succeeded() && summary.total > 0 {
        match std::fs::remove_dir_all(source) {
            Ok(()) => println!("Removed source directory {}", source.display()),
            Err(e) => tracing::warn!("Could not remove source {}: {}", source.display(), e),
        }
    }

    Ok(DirectoryOutcome {
        merged: summary.merged,
        total: summary.total,
    })
}

/// Confirm (or interactively correct) the recognized series identity.
fn confirm_series_info(
    guess: SeriesGuess,
    hints: &DirNameHints,
    episode_count: usize,
    yes: bool,
) -> Result<SeriesInfo> {
    let season = guess.season.or(hints.season).unwrap_or(1);
    let total_episodes = guess.episode_count.unwrap_or(episode_count);

    println!();
    println!("{}", "[Series]".bold());
    println!("  Title:    {}", guess.title.bold());
    println!(
        "  Year:     {}",
        guess
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );
    println!("  Season:   {}", season);
    println!("  Episodes: {}", total_episodes);
    if let Some(ref group) = hints.release_group {
        println!("  Group:    {}", group);
    }
    if guess.needs_confirmation {
        println!("  {}", "Recognition is unsure about this title".yellow());
    }

    if yes {
        return Ok(SeriesInfo {
            title: guess.title,
            year: guess.year,
            season,
            total_episodes,
            release_group: hints.release_group.clone(),
        });
    }

    loop {
        let choice = prompt("[1] Correct  [2] Fix title  [3] Fix everything\nChoice: ")?;
        match choice.as_str() {
            "1" => {
                return Ok(SeriesInfo {
                    title: guess.title,
                    year: guess.year,
                    season,
                    total_episodes,
                    release_group: hints.release_group.clone(),
                })
            }
            "2" => {
                let title = prompt("Correct title (English): ")?;
                return Ok(SeriesInfo {
                    title,
                    year: guess.year,
                    season,
                    total_episodes,
                    release_group: hints.release_group.clone(),
                });
            }
            "3" => {
                let title = prompt("Title (English): ")?;
                let year = prompt("Year (Enter to skip): ")?;
                let year = if year.is_empty() {
                    None
                } else {
                    year.parse().ok()
                };
                let season = prompt("Season number: ")?.parse().unwrap_or(season);
                return Ok(SeriesInfo {
                    title,
                    year,
                    season,
                    total_episodes,
                    release_group: hints.release_group.clone(),
                });
            }
            _ => println!("Invalid choice."),
        }
    }
}

/// Print the per-episode processing plan.
fn show_plan(groups: &BTreeMap<u32, EpisodeGroup>, series: &SeriesInfo) {
    println!();
    println!("{}", "[Plan]".bold());

    for (episode, group) in groups {
        let name = crate::generators::filename::episode_filename(series, *episode);
        println!();
        println!("  Episode {:02} -> {}", episode, name.bold());

        if let Some(ref video) = group.video {
            println!("    video:    {}", video.filename);
        } else {
            println!("    video:    {}", "missing".red());
        }
        if !group.audio.is_empty() {
            println!("    audio:    {} external track(s)", group.audio.len());
        }
        for sub in &group.subtitles {
            let label = sub.subtitle_origin_label.as_deref().unwrap_or("Unknown");
            println!("    subtitle: {}", label);
        }
    }
}

/// Read a trimmed line from stdin after printing a prompt.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Yes/no prompt.
fn prompt_yes(message: &str) -> Result<bool> {
    Ok(prompt(message)?.eq_ignore_ascii_case("y"))
}
