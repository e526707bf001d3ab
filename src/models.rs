//! Core data models for lyric parsing.
//!
//! This module contains the line and document types produced by the engine,
//! plus the summary records written by the batch CLI.

use serde::{Deserialize, Serialize};

// ============================================================================
// Lyric Models
// ============================================================================

/// A single displayable lyric line with its active window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    pub start_time: f64, // seconds
    pub end_time: f64,   // seconds, derived from the default duration and the next line
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default)]
    pub is_meta: bool,
}

impl LyricLine {
    /// Timed content line with a default duration (clipped later).
    pub fn timed(start_time: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time: start_time + duration,
            text: text.into(),
            translation: None,
            is_meta: false,
        }
    }

    /// Credit / attribution line. Meta lines never own a time window.
    pub fn meta(text: impl Into<String>) -> Self {
        Self {
            start_time: 0.0,
            end_time: 0.0,
            text: text.into(),
            translation: None,
            is_meta: true,
        }
    }

    /// Line used by static mode: synthetic `[index, index + 1)` window.
    pub fn sequential(index: usize, text: impl Into<String>, is_meta: bool) -> Self {
        Self {
            start_time: index as f64,
            end_time: index as f64 + 1.0,
            text: text.into(),
            translation: None,
            is_meta,
        }
    }
}

/// Result of parsing one lyric document.
///
/// `is_static` is true when no timestamps could be parsed. Static lines are
/// displayed in order and must never be highlighted by play-head time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedLyrics {
    pub lines: Vec<LyricLine>,
    pub is_static: bool,
}

impl ParsedLyrics {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            is_static: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Iterate over the lines that take part in time-based lookup.
    pub fn timed_lines(&self) -> impl Iterator<Item = (usize, &LyricLine)> {
        let is_static = self.is_static;
        self.lines
            .iter()
            .enumerate()
            .filter(move |(_, l)| !is_static && !l.is_meta)
    }

    pub fn meta_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_meta).count()
    }

    pub fn translated_count(&self) -> usize {
        self.lines.iter().filter(|l| l.translation.is_some()).count()
    }
}

impl Default for ParsedLyrics {
    fn default() -> Self {
        Self::empty()
    }
}

// ============================================================================
// Batch Models
// ============================================================================

/// How a single file ended up after batch parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    Timed,
    Static,
    Empty,
    Failed,
}

/// Per-file record kept for the stats summary.
#[derive(Clone, Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub outcome: FileOutcome,
    pub lines: usize,
    pub meta_lines: usize,
    pub translated_lines: usize,
    pub has_translation_file: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary written to `stats.json` after a batch run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchStats {
    pub files: usize,
    pub timed: usize,
    pub static_files: usize,
    pub empty: usize,
    pub failed: usize,
    pub total_lines: usize,
    pub elapsed_secs: f64,
    pub reports: Vec<FileReport>,
}

impl BatchStats {
    pub fn from_reports(reports: Vec<FileReport>, elapsed_secs: f64) -> Self {
        let mut stats = BatchStats {
            files: reports.len(),
            elapsed_secs,
            ..Default::default()
        };
        for r in &reports {
            match r.outcome {
                FileOutcome::Timed => stats.timed += 1,
                FileOutcome::Static => stats.static_files += 1,
                FileOutcome::Empty => stats.empty += 1,
                FileOutcome::Failed => stats.failed += 1,
            }
            stats.total_lines += r.lines;
        }
        stats.reports = reports;
        stats
    }
}
