//! Series title recognition via a local LLM.
//!
//! Configuration can be set via environment variables:
//! - `RECOGNIZER_HOST`: Ollama-compatible service URL (default: http://localhost:11434)
//! - `RECOGNIZER_MODEL`: Model to use (default: qwen2.5:7b)
//! - `RECOGNIZER_TIMEOUT`: Request timeout in seconds (default: 300)
//!
//! The recognizer is a best-effort oracle: any failure degrades to a guess
//! derived from the directory name, flagged `needs_confirmation`, and never
//! aborts the run.

use crate::core::parser::DirNameHints;
use crate::models::media::{MediaFile, MediaRole};
use crate::Result;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "qwen2.5:7b";
// CPU inference on a 7B model can take minutes
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Recognizer client configuration.
#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl RecognizerConfig {
    /// Create configuration from environment variables.
    /// Falls back to defaults if not set.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("RECOGNIZER_HOST").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let model = std::env::var("RECOGNIZER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs = std::env::var("RECOGNIZER_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            model,
            timeout_secs,
        }
    }
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Structured best-guess series identity returned by the oracle.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesGuess {
    pub title: String,
    pub year: Option<u16>,
    pub season: Option<u32>,
    pub episode_count: Option<usize>,
    /// Set when the oracle is unsure or the guess is hint-derived.
    #[serde(default)]
    pub needs_confirmation: bool,
}

/// Options for generation.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    seed: u32,
}

/// Generate request payload.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: String,
    options: GenerateOptions,
}

/// Generate response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Series recognition client.
pub struct Recognizer {
    config: RecognizerConfig,
    client: reqwest::Client,
}

impl Recognizer {
    /// Create a new recognizer with default configuration.
    pub fn new() -> Self {
        Self::with_config(RecognizerConfig::default())
    }

    /// Create a new recognizer with custom configuration.
    pub fn with_config(config: RecognizerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Check if the recognizer service is available.
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Ask the oracle for a series identity.
    ///
    /// Validated once here at the boundary; returns an error rather than an
    /// untyped guess so the caller can fall back to [`fallback_guess`].
    pub async fn analyze(
        &self,
        files: &[MediaFile],
        hints: &DirNameHints,
        directory_name: &str,
    ) -> Result<SeriesGuess> {
        let prompt = self.build_prompt(files, hints, directory_name);

        let url = format!("{}/api/generate", self.config.base_url);
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            stream: false,
            format: "json".to_string(),
            // temperature=0 and fixed seed for reproducible answers
            options: GenerateOptions {
                temperature: 0.0,
                seed: 42,
            },
        };

        let resp: GenerateResponse = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        let guess: SeriesGuess = serde_json::from_str(resp.response.trim())
            .map_err(|e| crate::Error::RecognitionFailed(e.to_string()))?;

        if guess.title.trim().is_empty() {
            return Err(crate::Error::RecognitionFailed(
                "oracle returned an empty title".to_string(),
            ));
        }

        Ok(guess)
    }

    fn build_prompt(
        &self,
        files: &[MediaFile],
        hints: &DirNameHints,
        directory_name: &str,
    ) -> String {
        let video_names: Vec<&str> = files
            .iter()
            .filter(|f| f.role == MediaRole::Video)
            .take(3)
            .map(|f| f.filename.as_str())
            .collect();

        format!(
            r#"You are an expert at identifying TV series and anime from release file names.

Directory: {dir}
Sample video files:
{videos}

Hints parsed from the directory name:
- title: {title}
- season: {season}
- release group: {group}

Return ONLY a JSON object with these fields:
{{"title": "official English series title", "year": first-air year or null, "season": season number or null, "episode_count": number of episodes or null, "needs_confirmation": true if you are unsure}}"#,
            dir = directory_name,
            videos = video_names.join("\n"),
            title = hints.title.as_deref().unwrap_or("unknown"),
            season = hints
                .season
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            group = hints.release_group.as_deref().unwrap_or("unknown"),
        )
    }
}

impl Default for Recognizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Hint-derived guess used when the oracle is unavailable or fails.
pub fn fallback_guess(hints: &DirNameHints, files: &[MediaFile]) -> SeriesGuess {
    let video_count = files.iter().filter(|f| f.role == MediaRole::Video).count();

    SeriesGuess {
        title: hints.title.clone().unwrap_or_else(|| "Unknown".to_string()),
        year: hints.year,
        season: hints.season,
        episode_count: Some(video_count),
        needs_confirmation: true,
    }
}
