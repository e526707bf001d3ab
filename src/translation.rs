//! Translation merging.
//!
//! Two strategies, never mixed for one song:
//! - a separate translation document keyed by start time (tenths of a second);
//! - a trailing CJK parenthetical inside the primary line.

use rustc_hash::FxHashMap;

use crate::models::LyricLine;
use crate::normalize::{contains_cjk, split_standard_timestamps, trim_line, BRACKET_TRANSLATION};

/// Lookup key for a start time: seconds rounded to one decimal place, in tenths.
///
/// Rounds the exact binary value, so 1.45 (stored as 1.4499...) keys as 14.
/// Exact ties such as 1.25 round up.
pub fn tenths_key(seconds: f64) -> i64 {
    let scaled = seconds * 10.0;
    // Quarter values are exact in binary and are the only true ties
    if (seconds * 4.0).fract() == 0.0 && (seconds * 2.0).fract() != 0.0 {
        return (scaled.floor() + 1.0) as i64;
    }
    format!("{:.1}", seconds)
        .replace('.', "")
        .parse()
        .unwrap_or_else(|_| scaled.round() as i64)
}

/// Start-time index over a translation document in the standard dialect.
#[derive(Debug, Default)]
pub struct TranslationIndex {
    entries: FxHashMap<i64, String>,
}

impl TranslationIndex {
    /// Parse a translation document. Non-timestamped and empty lines are skipped;
    /// a later line at the same tenth replaces an earlier one.
    pub fn parse(text: &str) -> Self {
        let mut entries = FxHashMap::default();
        for raw in text.lines() {
            let (times, content) = split_standard_timestamps(trim_line(raw));
            if content.is_empty() {
                continue;
            }
            for time in times {
                entries.insert(tenths_key(time), content.to_string());
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, start_time: f64) -> Option<&str> {
        self.entries.get(&tenths_key(start_time)).map(String::as_str)
    }

    /// Attach translations to every non-meta line with a matching start time.
    /// Returns the number of lines that received one.
    pub fn apply(&self, lines: &mut [LyricLine]) -> usize {
        let mut matched = 0;
        for line in lines.iter_mut().filter(|l| !l.is_meta) {
            if let Some(t) = self.get(line.start_time) {
                line.translation = Some(t.to_string());
                matched += 1;
            }
        }
        matched
    }
}

/// Split "<main> (<sub>)" when `<sub>` holds a CJK ideograph.
/// Returns `None` when the line has no such trailing parenthetical.
pub fn split_bracket_translation(text: &str) -> Option<(String, String)> {
    let caps = BRACKET_TRANSLATION.captures(text)?;
    let main = caps[1].trim();
    let sub = caps[2].trim();
    if main.is_empty() || !contains_cjk(sub) {
        return None;
    }
    Some((main.to_string(), sub.to_string()))
}

/// Apply the bracket heuristic to every non-meta line.
pub fn apply_bracket_translations(lines: &mut [LyricLine]) -> usize {
    let mut matched = 0;
    for line in lines.iter_mut().filter(|l| !l.is_meta) {
        if let Some((main, sub)) = split_bracket_translation(&line.text) {
            line.text = main;
            line.translation = Some(sub);
            matched += 1;
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenths_key() {
        assert_eq!(tenths_key(10.0), 100);
        assert_eq!(tenths_key(10.04), 100);
        assert_eq!(tenths_key(10.06), 101);
        assert_eq!(tenths_key(83.42), 834);
        assert_eq!(tenths_key(1.45), 14);
        assert_eq!(tenths_key(1.25), 13);
        assert_eq!(tenths_key(1.75), 18);
        assert_eq!(tenths_key(0.0), 0);
    }

    #[test]
    fn test_rounding_follows_stored_value() {
        // 1.45 is stored just below 1.45, so it pairs with 1.4, not 1.5
        let index = TranslationIndex::parse("[00:01.40]你好");
        let mut lines = vec![LyricLine::timed(1.0 + 0.45, 10.0, "Hello")];
        assert_eq!(index.apply(&mut lines), 1);
        assert_eq!(lines[0].translation.as_deref(), Some("你好"));

        let index = TranslationIndex::parse("[00:01.49]你好");
        let mut lines = vec![LyricLine::timed(1.0 + 0.45, 10.0, "Hello")];
        assert_eq!(index.apply(&mut lines), 0);
    }

    #[test]
    fn test_index_parse_and_lookup() {
        let index = TranslationIndex::parse("[00:10.00]你好\n[00:12.50]世界\nnot timed\n[00:14.00]\n");
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(10.0), Some("你好"));
        assert_eq!(index.get(12.52), Some("世界"));
        assert_eq!(index.get(14.0), None);
    }

    #[test]
    fn test_index_later_duplicate_wins() {
        let index = TranslationIndex::parse("[00:10.00]first\n[00:10.01]second");
        assert_eq!(index.get(10.0), Some("second"));
    }

    #[test]
    fn test_index_skips_meta_lines() {
        let index = TranslationIndex::parse("[00:00.00]译者");
        let mut lines = vec![LyricLine::meta("作词：张三"), LyricLine::timed(0.0, 10.0, "Hi")];
        assert_eq!(index.apply(&mut lines), 1);
        assert_eq!(lines[0].translation, None);
        assert_eq!(lines[1].translation.as_deref(), Some("译者"));
    }

    #[test]
    fn test_split_bracket_translation() {
        assert_eq!(
            split_bracket_translation("Hello (你好)"),
            Some(("Hello".to_string(), "你好".to_string()))
        );
        assert_eq!(
            split_bracket_translation("Hello（你好）"),
            Some(("Hello".to_string(), "你好".to_string()))
        );
        assert_eq!(split_bracket_translation("Hello (World)"), None);
        assert_eq!(split_bracket_translation("Hello"), None);
        // Parenthetical must be trailing
        assert_eq!(split_bracket_translation("Hello (你好) there"), None);
        assert_eq!(split_bracket_translation("(你好)"), None);
    }
}
