//! Episode filename generator.

use crate::models::media::SeriesInfo;

/// Generate the Plex-standard episode filename.
///
/// Format: `${NormalizedTitle} - S${NN}E${EE}.mkv`
pub fn episode_filename(series: &SeriesInfo, episode: u32) -> String {
    format!(
        "{} - S{:02}E{:02}.mkv",
        normalize_title(&series.title),
        series.season,
        episode
    )
}

/// Normalize a series title for use in file and folder names.
///
/// Characters illegal in filenames are stripped (not replaced), runs of
/// whitespace collapse to one space, and trailing punctuation is trimmed so
/// equivalent titles never create divergent folder names.
pub fn normalize_title(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|c| !matches!(c, ':' | '/' | '\\' | '|' | '?' | '*' | '"' | '\'' | '<' | '>'))
        .collect();

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed
        .trim_end_matches(['.', ',', '-', '_', ' '])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(title: &str, season: u32) -> SeriesInfo {
        SeriesInfo {
            title: title.to_string(),
            year: None,
            season,
            total_episodes: 12,
            release_group: None,
        }
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(
            normalize_title("Dr. Stone: Science Future"),
            "Dr. Stone Science Future"
        );
        assert_eq!(
            normalize_title("Attack on Titan: Final Season"),
            "Attack on Titan Final Season"
        );
        assert_eq!(normalize_title("Series / Movie"), "Series Movie");
        assert_eq!(normalize_title("  Spaced   Out  "), "Spaced Out");
        assert_eq!(normalize_title("Trailing Dots..."), "Trailing Dots");
    }

    #[test]
    fn test_equivalent_titles_converge() {
        assert_eq!(
            normalize_title("Show: The Sequel"),
            normalize_title("Show The Sequel")
        );
    }

    #[test]
    fn test_episode_filename() {
        assert_eq!(
            episode_filename(&series("My Show", 1), 5),
            "My Show - S01E05.mkv"
        );
        assert_eq!(
            episode_filename(&series("Other: Show", 12), 3),
            "Other Show - S12E03.mkv"
        );
    }
}
