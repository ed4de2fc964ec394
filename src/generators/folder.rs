//! Output folder name generator.

use super::filename::normalize_title;
use crate::models::media::SeriesInfo;
use std::path::{Path, PathBuf};

/// Generate the series folder name.
///
/// Format: `${NormalizedTitle}` or `${NormalizedTitle} (${year})`.
pub fn series_folder(series: &SeriesInfo) -> String {
    let title = normalize_title(&series.title);
    match series.year {
        Some(year) => format!("{} ({})", title, year),
        None => title,
    }
}

/// Generate the season folder name.
///
/// Format: `Season ${NN}`.
pub fn season_folder(season: u32) -> String {
    format!("Season {:02}", season)
}

/// Full output directory for a series:
/// `<parent>/<NormalizedTitle>[ (<year>)]/Season <NN>`.
pub fn output_dir(parent: &Path, series: &SeriesInfo) -> PathBuf {
    parent
        .join(series_folder(series))
        .join(season_folder(series.season))
}
