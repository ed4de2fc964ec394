//! Configuration model.
//!
//! The configuration is built once at startup and passed by reference into
//! each component; nothing reads process environment inside deep call stacks.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target bitrate for AAC transcodes (e.g. "192k").
    pub aac_bitrate: String,
    /// Language tag assigned to embedded subtitle tracks.
    pub subtitle_language: String,
    /// Display name for subtitle tracks without a recognized origin label.
    pub default_subtitle_name: String,
    /// Minimum duration (seconds) for a valid output file.
    pub min_duration_secs: f64,
    /// Name of the per-run scratch directory created inside the source.
    pub temp_dir_name: String,
    /// Known release-group tokens and the display labels they map to.
    pub subtitle_groups: Vec<SubtitleGroup>,
}

/// One known fansub/release group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleGroup {
    /// Lowercase token matched against filename and parent directory.
    pub token: String,
    /// Display name used for the embedded track.
    pub label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aac_bitrate: "192k".to_string(),
            subtitle_language: "rus".to_string(),
            default_subtitle_name: "Russian".to_string(),
            min_duration_secs: 60.0,
            temp_dir_name: ".assembly_temp".to_string(),
            subtitle_groups: default_subtitle_groups(),
        }
    }
}

fn default_subtitle_groups() -> Vec<SubtitleGroup> {
    [
        ("animevod", "Animevod"),
        ("crunchyroll", "Crunchyroll"),
        ("budlight", "BudLightSubs"),
        ("cr", "CR"),
    ]
    .iter()
    .map(|(token, label)| SubtitleGroup {
        token: token.to_string(),
        label: label.to_string(),
    })
    .collect()
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("episode_organizer")
}

/// Load configuration from file, applying environment overrides.
///
/// The `AAC_BITRATE` variable overrides the file value; it is read here,
/// at construction time, and nowhere else.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    let mut config = Config::default();
    if config_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(parsed) = toml::from_str(&content) {
                config = parsed;
            }
        }
    }

    if let Ok(bitrate) = std::env::var("AAC_BITRATE") {
        if !bitrate.is_empty() {
            config.aac_bitrate = bitrate;
        }
    }

    config
}
