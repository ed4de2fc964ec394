//! File classifier module.
//!
//! Scans a source directory recursively, assigns each file a role from its
//! extension, extracts episode/season numbers and subtitle origin labels,
//! and flags duplicate subtitle files.

use crate::models::config::{Config, SubtitleGroup};
use crate::models::media::{MediaFile, MediaRole};
use crate::Result;
use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

/// Supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "m4v", "ts"];

/// Supported external audio track extensions.
const AUDIO_EXTENSIONS: &[&str] = &["mka", "aac", "mp3", "flac", "ac3", "dts"];

/// Supported subtitle extensions.
const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "ass", "ssa", "sub", "sup"];

/// Sidecar files some release groups ship alongside episodes.
const IGNORED_FILENAMES: &[&str] = &["Комментарий.txt"];

/// Map a lowercase extension to a media role.
fn role_for_extension(ext: &str) -> Option<MediaRole> {
    if VIDEO_EXTENSIONS.contains(&ext) {
        Some(MediaRole::Video)
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        Some(MediaRole::Audio)
    } else if SUBTITLE_EXTENSIONS.contains(&ext) {
        Some(MediaRole::Subtitle)
    } else {
        None
    }
}

/// Extract (season, episode) from a filename.
///
/// The canonical pattern is case-insensitive `S<digits>E<digits>`; anything
/// else leaves both unset and the file is excluded from grouping.
pub fn extract_episode_info(filename: &str) -> (Option<u32>, Option<u32>) {
    if let Ok(re) = regex::Regex::new(r"(?i)S(\d{1,2})E(\d{1,3})") {
        if let Some(caps) = re.captures(filename) {
            let season = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let episode = caps.get(2).and_then(|m| m.as_str().parse().ok());
            return (season, episode);
        }
    }
    (None, None)
}

/// Check whether `token` occurs in `haystack` as a delimited word.
///
/// Plain substring search would make short tokens like "cr" match inside
/// unrelated words, so both ends of the match must be non-alphanumeric.
fn contains_token(haystack: &str, token: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(token) {
        let begin = start + pos;
        let end = begin + token.len();
        let left_ok = begin == 0
            || !haystack[..begin]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let right_ok = end == haystack.len()
            || !haystack[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric());
        if left_ok && right_ok {
            return true;
        }
        start = end;
    }
    false
}

/// Determine the subtitle origin label from filename and parent directory.
pub fn detect_origin_label(
    filename: &str,
    parent_dir: &str,
    groups: &[SubtitleGroup],
) -> Option<String> {
    let filename_lower = filename.to_lowercase();
    let parent_lower = parent_dir.to_lowercase();

    for group in groups {
        if contains_token(&filename_lower, &group.token)
            || contains_token(&parent_lower, &group.token)
        {
            return Some(group.label.clone());
        }
    }
    None
}

/// Classify a list of (path, size) entries into MediaFiles.
///
/// Entries whose extension matches none of the known sets are dropped.
/// Subtitle entries sharing an (episode, origin label, size) triple with an
/// earlier entry are flagged as duplicates; input order decides which one is
/// kept, so callers wanting reproducible results must sort first.
pub fn classify_entries(entries: &[(std::path::PathBuf, u64)], config: &Config) -> Vec<MediaFile> {
    let mut files = Vec::new();
    let mut seen_subtitles: HashMap<(Option<u32>, Option<String>, u64), ()> = HashMap::new();

    for (path, size) in entries {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        if IGNORED_FILENAMES.contains(&filename.as_str()) {
            continue;
        }

        let ext = match crate::utils::fs::get_extension(path) {
            Some(ext) => ext,
            None => continue,
        };
        let role = match role_for_extension(&ext) {
            Some(role) => role,
            None => continue,
        };

        let (season, episode) = extract_episode_info(&filename);

        let mut media_file = MediaFile {
            path: path.clone(),
            filename: filename.clone(),
            size: *size,
            role,
            episode_number: episode,
            season_number: season,
            subtitle_origin_label: None,
            is_duplicate: false,
        };

        if role == MediaRole::Subtitle {
            let parent_name = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("");
            media_file.subtitle_origin_label =
                detect_origin_label(&filename, parent_name, &config.subtitle_groups);

            let key = (
                episode,
                media_file.subtitle_origin_label.clone(),
                *size,
            );
            if seen_subtitles.contains_key(&key) {
                media_file.is_duplicate = true;
                tracing::debug!("Duplicate subtitle: {}", filename);
            } else {
                seen_subtitles.insert(key, ());
            }
        }

        files.push(media_file);
    }

    files
}

/// Scan a directory and classify every media file in it.
///
/// Entries are sorted by path before classification so duplicate selection
/// and video tie-breaks are stable across filesystems. A file whose size
/// cannot be read fails the whole scan.
pub fn scan_directory(path: &Path, config: &Config) -> Result<Vec<MediaFile>> {
    crate::utils::fs::ensure_directory(path)?;

    let mut entries = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let entry_path = entry.path();
        let metadata =
            std::fs::metadata(entry_path).map_err(|e| crate::Error::FileUnreadable {
                path: entry_path.display().to_string(),
                source: e,
            })?;
        entries.push((entry_path.to_path_buf(), metadata.len()));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let files = classify_entries(&entries, config);

    let count_of = |role: MediaRole| files.iter().filter(|f| f.role == role).count();
    tracing::info!(
        "Scanned {}: {} files classified ({} video, {} audio, {} subtitle)",
        path.display(),
        files.len(),
        count_of(MediaRole::Video),
        count_of(MediaRole::Audio),
        count_of(MediaRole::Subtitle),
    );

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_role_for_extension() {
        assert_eq!(role_for_extension("mkv"), Some(MediaRole::Video));
        assert_eq!(role_for_extension("avi"), Some(MediaRole::Video));
        assert_eq!(role_for_extension("mka"), Some(MediaRole::Audio));
        assert_eq!(role_for_extension("ass"), Some(MediaRole::Subtitle));
        assert_eq!(role_for_extension("txt"), None);
        assert_eq!(role_for_extension("jpg"), None);
    }

    #[test]
    fn test_extract_episode_info() {
        assert_eq!(extract_episode_info("Show.S01E05.mkv"), (Some(1), Some(5)));
        assert_eq!(extract_episode_info("show.s02e12.ru.ass"), (Some(2), Some(12)));
        assert_eq!(extract_episode_info("Show.S1E105.mkv"), (Some(1), Some(105)));
        assert_eq!(extract_episode_info("Show.Episode.5.mkv"), (None, None));
        assert_eq!(extract_episode_info("readme.txt"), (None, None));
    }

    #[test]
    fn test_contains_token() {
        assert!(contains_token("show.s01e01.cr.ass", "cr"));
        assert!(contains_token("[crunchyroll] subs", "crunchyroll"));
        assert!(!contains_token("secret.ass", "cr"));
        assert!(!contains_token("scream.s01e01.ass", "cr"));
    }

    #[test]
    fn test_detect_origin_label() {
        let config = Config::default();
        assert_eq!(
            detect_origin_label("Show.S01E01.CR.ass", "", &config.subtitle_groups),
            Some("CR".to_string())
        );
        assert_eq!(
            detect_origin_label("Show.S01E01.ass", "Crunchyroll", &config.subtitle_groups),
            Some("Crunchyroll".to_string())
        );
        assert_eq!(
            detect_origin_label("Show.S01E01.ass", "subs", &config.subtitle_groups),
            None
        );
    }

    #[test]
    fn test_classify_drops_unknown_extensions() {
        let config = Config::default();
        let entries = vec![
            (PathBuf::from("Show.S01E01.mkv"), 1000),
            (PathBuf::from("Show.S01E01.nfo"), 10),
            (PathBuf::from("poster.jpg"), 20),
        ];
        let files = classify_entries(&entries, &config);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].role, MediaRole::Video);
    }

    #[test]
    fn test_duplicate_subtitles_first_wins() {
        let config = Config::default();
        let entries = vec![
            (PathBuf::from("a/Show.S01E03.CR.ass"), 10240),
            (PathBuf::from("b/Show.S01E03.CR.ass"), 10240),
            (PathBuf::from("c/Show.S01E03.CR.ass"), 9999),
        ];
        let files = classify_entries(&entries, &config);
        assert_eq!(files.len(), 3);
        assert!(!files[0].is_duplicate);
        assert!(files[1].is_duplicate);
        // Different size is not a duplicate
        assert!(!files[2].is_duplicate);
    }

    #[test]
    fn test_commentary_sidecar_skipped() {
        let config = Config::default();
        let entries = vec![(PathBuf::from("Комментарий.txt"), 5)];
        assert!(classify_entries(&entries, &config).is_empty());
    }
}
