//! Engine configuration.
//!
//! Vocabularies and default durations live here rather than in the parser so
//! new credit keywords or tags can be added from a TOML file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Default line duration for the standard `[mm:ss.xx]` dialect (seconds).
pub const STANDARD_LINE_DURATION: f64 = 10.0;

/// Default line duration for the word-timed `[start,duration]` dialect (seconds).
pub const WORD_TIMED_LINE_DURATION: f64 = 5.0;

/// Credit-role keywords, matched case-insensitively at the start of a line
/// and followed by `:` or `：`.
pub const DEFAULT_CREDIT_KEYWORDS: &[&str] = &[
    // Chinese roles
    "歌词贡献者",
    "翻译贡献者",
    "作词",
    "作曲",
    "编曲",
    "谱曲",
    "填词",
    "词曲",
    "词",
    "曲",
    "制作人",
    "制作",
    "录音",
    "混音",
    "母带",
    "演唱",
    "和声",
    "监制",
    "统筹",
    "出品",
    "发行",
    // English roles
    "Lyricist",
    "Lyrics",
    "Composer",
    "Arranger",
    "Executive Producer",
    "Producer",
    "Mixing",
    "Mix",
    "Mastering",
    "Recording",
    "Vocals",
    "Vocal",
    "Coordination",
    "Coordinator",
    "Label",
    "Distribution",
    // Rights markers (original publisher / sub-publisher)
    "OP",
    "SP",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Default duration for standard lines before clipping.
    pub standard_duration: f64,
    /// Default duration for word-timed lines before clipping.
    pub word_timed_duration: f64,
    pub credit_keywords: Vec<String>,
    /// Tags whose value is shown as a meta line (`[ar:Artist]`).
    pub meta_tags: Vec<String>,
    /// Tags that configure playback and are dropped outright (`[ti:..]`, `[offset:..]`).
    pub dropped_tags: Vec<String>,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            standard_duration: STANDARD_LINE_DURATION,
            word_timed_duration: WORD_TIMED_LINE_DURATION,
            credit_keywords: DEFAULT_CREDIT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            meta_tags: ["ar", "al", "by", "au"].iter().map(|s| s.to_string()).collect(),
            dropped_tags: ["ti", "offset", "length"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LyricsConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: LyricsConfig = toml::from_str(s).context("Invalid lyrics config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("Failed to load config '{}'", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.standard_duration > 0.0) || !(self.word_timed_duration > 0.0) {
            anyhow::bail!("Line durations must be positive");
        }
        if self.credit_keywords.iter().all(|k| k.trim().is_empty()) {
            anyhow::bail!("Credit keyword list must not be empty");
        }
        Ok(())
    }

    pub fn is_meta_tag(&self, tag: &str) -> bool {
        self.meta_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn is_dropped_tag(&self, tag: &str) -> bool {
        self.dropped_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        let config = LyricsConfig::default();
        assert_eq!(config.standard_duration, 10.0);
        assert_eq!(config.word_timed_duration, 5.0);
        assert!(config.is_meta_tag("AR"));
        assert!(config.is_dropped_tag("offset"));
        assert!(!config.is_meta_tag("ti"));
    }

    #[test]
    fn test_partial_toml_override() {
        let config = LyricsConfig::from_toml_str(
            r#"
standard_duration = 8.0
credit_keywords = ["Lyricist", "Guitar"]
"#,
        )
        .unwrap();
        assert_eq!(config.standard_duration, 8.0);
        assert_eq!(config.word_timed_duration, 5.0);
        assert_eq!(config.credit_keywords, vec!["Lyricist", "Guitar"]);
        assert!(config.is_meta_tag("al"));
    }

    #[test]
    fn test_rejects_empty_vocabulary() {
        let result = LyricsConfig::from_toml_str("credit_keywords = []");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let result = LyricsConfig::from_toml_str("word_timed_duration = 0.0");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let err = LyricsConfig::load(Path::new("/nonexistent/lyrics.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lyrics.toml"));
    }
}
