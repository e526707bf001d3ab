//! Lyric document parser.
//!
//! Each raw line is classified by an ordered list of matchers (first match wins):
//! opaque `{...}` lines, tag lines, credit lines, word-timed lines, standard
//! lines. Anything left over is plain text, kept only for static fallback.
//!
//! Parsing never fails: unparseable documents degrade to static mode, and a
//! document with nothing left after preprocessing yields an empty static result.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LyricsConfig;
use crate::models::{LyricLine, ParsedLyrics};
use crate::normalize::{
    build_credit_pattern, split_standard_timestamps, static_text, strip_leading_bracket,
    strip_word_timing, trim_line, TAG_LINE, WORD_TIMED_LINE,
};
use crate::translation::{apply_bracket_translations, TranslationIndex};

static DEFAULT_ENGINE: Lazy<LyricsEngine> = Lazy::new(|| {
    LyricsEngine::new(LyricsConfig::default()).expect("default lyrics config is valid")
});

/// Parse lyrics with the default configuration.
pub fn parse_lyrics(primary: &str, translation: Option<&str>) -> ParsedLyrics {
    DEFAULT_ENGINE.parse(primary, translation)
}

/// Credit-keyword test with the default vocabulary.
pub fn is_credit_line(text: &str) -> bool {
    DEFAULT_ENGINE.is_credit(text)
}

// ============================================================================
// Line Classification
// ============================================================================

/// What a single preprocessed line turned out to be.
#[derive(Debug, Clone, PartialEq)]
enum LineClass {
    /// Opaque `{...}` lines, dropped tags, and meta tags with no value.
    Dropped,
    Meta(String),
    Timed {
        times: Vec<f64>,
        duration: f64,
        content: String,
    },
    Plain,
}

type Matcher = fn(&LyricsEngine, &str) -> Option<LineClass>;

const MATCHERS: &[Matcher] = &[
    LyricsEngine::match_opaque,
    LyricsEngine::match_tag,
    LyricsEngine::match_credit,
    LyricsEngine::match_word_timed,
    LyricsEngine::match_standard,
];

// ============================================================================
// Engine
// ============================================================================

/// Configured parser. Holds the credit matcher compiled from the vocabulary.
#[derive(Debug, Clone)]
pub struct LyricsEngine {
    config: LyricsConfig,
    credit_pattern: Regex,
}

impl LyricsEngine {
    pub fn new(config: LyricsConfig) -> Result<Self> {
        config.validate()?;
        let credit_pattern = build_credit_pattern(&config.credit_keywords)?;
        Ok(Self {
            config,
            credit_pattern,
        })
    }

    /// Shared engine built from `LyricsConfig::default()`.
    pub fn default_engine() -> &'static LyricsEngine {
        &DEFAULT_ENGINE
    }

    pub fn config(&self) -> &LyricsConfig {
        &self.config
    }

    /// True if the text starts with a credit keyword followed by `:` or `：`.
    pub fn is_credit(&self, text: &str) -> bool {
        self.credit_pattern.is_match(text.trim())
    }

    /// Parse a lyric document and an optional translation document.
    ///
    /// A blank translation document counts as absent. When one is supplied the
    /// bracket heuristic is skipped, even if the document matches nothing.
    pub fn parse(&self, primary: &str, translation: Option<&str>) -> ParsedLyrics {
        let translation = translation.filter(|t| !trim_line(t).is_empty());

        let mut lines: Vec<LyricLine> = Vec::new();
        // Static-mode text, flagged when it came from a tag or credit line
        let mut fallback: Vec<(String, bool)> = Vec::new();

        for raw in primary.lines() {
            let trimmed = trim_line(raw);
            if trimmed.is_empty() {
                continue;
            }
            let cleaned = strip_word_timing(trimmed);
            if cleaned.is_empty() {
                continue;
            }

            match self.classify(&cleaned) {
                LineClass::Dropped => {}
                LineClass::Meta(text) => {
                    fallback.push((text.clone(), true));
                    lines.push(LyricLine::meta(text));
                }
                LineClass::Timed {
                    times,
                    duration,
                    content,
                } => {
                    push_fallback(&mut fallback, &cleaned);
                    if content.is_empty() {
                        continue;
                    }
                    for time in times {
                        lines.push(LyricLine::timed(time, duration, content.clone()));
                    }
                }
                LineClass::Plain => push_fallback(&mut fallback, &cleaned),
            }
        }

        if !lines.iter().any(|l| !l.is_meta) {
            return self.static_fallback(fallback);
        }

        match translation {
            Some(doc) => {
                let index = TranslationIndex::parse(doc);
                let matched = index.apply(&mut lines);
                tracing::debug!(entries = index.len(), matched, "Merged translation document");
            }
            None => {
                let matched = apply_bracket_translations(&mut lines);
                if matched > 0 {
                    tracing::debug!(matched, "Split bracket translations");
                }
            }
        }

        lines.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        clip_windows(&mut lines);

        let parsed = ParsedLyrics {
            lines,
            is_static: false,
        };
        tracing::debug!(
            lines = parsed.len(),
            meta = parsed.meta_count(),
            translated = parsed.translated_count(),
            "Parsed timed lyrics"
        );
        parsed
    }

    fn classify(&self, line: &str) -> LineClass {
        MATCHERS
            .iter()
            .find_map(|matcher| matcher(self, line))
            .unwrap_or(LineClass::Plain)
    }

    fn match_opaque(&self, line: &str) -> Option<LineClass> {
        line.starts_with('{').then_some(LineClass::Dropped)
    }

    fn match_tag(&self, line: &str) -> Option<LineClass> {
        let caps = TAG_LINE.captures(line)?;
        let tag = &caps[1];
        if self.config.is_dropped_tag(tag) {
            return Some(LineClass::Dropped);
        }
        if !self.config.is_meta_tag(tag) {
            return None;
        }
        let value = caps[2].trim();
        if value.is_empty() {
            Some(LineClass::Dropped)
        } else {
            Some(LineClass::Meta(value.to_string()))
        }
    }

    fn match_credit(&self, line: &str) -> Option<LineClass> {
        let (times, rest) = split_standard_timestamps(line);
        let content = if times.is_empty() {
            strip_leading_bracket(line)
        } else {
            rest
        };
        self.credit_pattern
            .is_match(content)
            .then(|| LineClass::Meta(content.to_string()))
    }

    fn match_word_timed(&self, line: &str) -> Option<LineClass> {
        let caps = WORD_TIMED_LINE.captures(line)?;
        // Out-of-range integers fall through to the next matcher
        let start_ms: u64 = caps[1].parse().ok()?;
        let _duration_ms: u64 = caps[2].parse().ok()?;
        Some(LineClass::Timed {
            times: vec![start_ms as f64 / 1000.0],
            duration: self.config.word_timed_duration,
            content: caps[3].trim().to_string(),
        })
    }

    fn match_standard(&self, line: &str) -> Option<LineClass> {
        let (times, content) = split_standard_timestamps(line);
        if times.is_empty() {
            return None;
        }
        Some(LineClass::Timed {
            times,
            duration: self.config.standard_duration,
            content: content.to_string(),
        })
    }

    fn static_fallback(&self, fallback: Vec<(String, bool)>) -> ParsedLyrics {
        if fallback.is_empty() {
            return ParsedLyrics::empty();
        }
        tracing::debug!(lines = fallback.len(), "No timestamps found, using static lyrics");
        let lines = fallback
            .into_iter()
            .enumerate()
            .map(|(i, (text, tagged))| {
                let is_meta = tagged || self.is_credit(&text);
                LyricLine::sequential(i, text, is_meta)
            })
            .collect();
        ParsedLyrics {
            lines,
            is_static: true,
        }
    }
}

impl Default for LyricsEngine {
    fn default() -> Self {
        DEFAULT_ENGINE.clone()
    }
}

fn push_fallback(fallback: &mut Vec<(String, bool)>, line: &str) {
    let text = static_text(line);
    if !text.is_empty() {
        fallback.push((text.to_string(), false));
    }
}

/// Clip each non-meta line so it ends no later than the next non-meta line starts.
/// Lines must already be sorted by start time.
fn clip_windows(lines: &mut [LyricLine]) {
    let mut next_start: Option<f64> = None;
    for line in lines.iter_mut().rev() {
        if line.is_meta {
            continue;
        }
        if let Some(next) = next_start {
            if line.end_time > next {
                line.end_time = next;
            }
        }
        next_start = Some(line.start_time);
    }
}

// ============================================================================
// TESTS
// ============================================================================
