//! Directory-name parser.
//!
//! Best-effort extraction of series hints (title, year, season, release
//! group) from the source directory's name. These hints feed the title
//! recognition oracle and serve as the fallback identity when it is
//! unavailable.

/// Hints parsed from a directory name.
#[derive(Debug, Clone, Default)]
pub struct DirNameHints {
    pub title: Option<String>,
    pub year: Option<u16>,
    pub season: Option<u32>,
    pub release_group: Option<String>,
}

/// Parse a directory name like
/// `[Fansub] Show Title S02 (2021) [1080p]` or `Show.Title.S01.1080p-GROUP`.
pub fn parse_directory_name(dirname: &str) -> DirNameHints {
    let mut hints = DirNameHints::default();

    // Leading [Group] tag
    if let Ok(re) = regex::Regex::new(r"^\[([^\]]+)\]") {
        if let Some(caps) = re.captures(dirname) {
            hints.release_group = caps.get(1).map(|m| m.as_str().trim().to_string());
        }
    }

    // Trailing -GROUP tag (scene style), only when no bracket tag was found
    if hints.release_group.is_none() {
        if let Ok(re) = regex::Regex::new(r"-([A-Za-z0-9]+)$") {
            if let Some(caps) = re.captures(dirname) {
                hints.release_group = caps.get(1).map(|m| m.as_str().to_string());
            }
        }
    }

    // Year in brackets/parens or delimited: (2021), [2021], .2021.
    if let Ok(re) = regex::Regex::new(r"[\(\[\.\s_-]((?:19|20)\d{2})[\)\]\.\s_-]") {
        if let Some(caps) = re.captures(dirname) {
            hints.year = caps.get(1).and_then(|m| m.as_str().parse().ok());
        }
    }

    // Season: "S02" (not followed by Exx) or "Season 2"
    if let Ok(re) = regex::Regex::new(r"(?i)\bS(\d{1,2})\b") {
        if let Some(caps) = re.captures(dirname) {
            hints.season = caps.get(1).and_then(|m| m.as_str().parse().ok());
        }
    }
    if hints.season.is_none() {
        if let Ok(re) = regex::Regex::new(r"(?i)season[\s._-]*(\d{1,2})") {
            if let Some(caps) = re.captures(dirname) {
                hints.season = caps.get(1).and_then(|m| m.as_str().parse().ok());
            }
        }
    }

    hints.title = extract_title(dirname);
    hints
}

/// Strip tags and markers, keep what is left in front as the title.
fn extract_title(dirname: &str) -> Option<String> {
    let mut name = dirname.to_string();

    // Drop bracketed tags entirely
    if let Ok(re) = regex::Regex::new(r"\[[^\]]*\]") {
        name = re.replace_all(&name, " ").to_string();
    }

    // Cut at the first structural marker: season, year, or quality token
    if let Ok(re) = regex::Regex::new(
        r"(?i)[\s._(-]+(?:s\d{1,2}\b|season[\s._-]*\d|(?:19|20)\d{2}\b|\d{3,4}p\b|bdrip|web-?dl|webrip|hdtv|x26[45]|hevc)",
    ) {
        if let Some(m) = re.find(&name) {
            name.truncate(m.start());
        }
    }

    // Separators to spaces
    let name = name.replace(['.', '_'], " ");
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let name = name.trim().trim_matches('-').trim().to_string();

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
