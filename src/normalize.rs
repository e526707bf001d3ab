//! Shared line normalization for lyric parsing.
//! Used by the parser, the translation index and the NetEase source shaping.
//!
//! All patterns use `[0-9]` rather than `\d`: `\d` is Unicode-aware in the
//! regex crate and would accept full-width digits that later fail to parse.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Inline word-timing annotations: "(0,200)", "(1520,310,0)".
pub static WORD_TIMING_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([0-9]+(?:,[0-9]+)*\)").unwrap());

/// Word-timed line: "[12000,3400]content"
pub static WORD_TIMED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([0-9]+),([0-9]+)\](.*)$").unwrap());

/// Leading word-timed prefix only, used when collecting static fallback text.
pub static WORD_TIMED_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[0-9]+,[0-9]+\]").unwrap());

/// One standard timestamp at the start of the input: "[01:23]", "[01:23.4]", "[01:23.456]"
pub static STANDARD_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([0-9]{2}):([0-9]{2})(?:\.([0-9]{1,3}))?\]").unwrap());

/// Whole-line tag: "[ar:Artist]", "[offset:+200]"
pub static TAG_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([A-Za-z]+):(.*)\]$").unwrap());

/// First bracketed prefix of a line (timestamp or tag), non-greedy.
pub static LEADING_BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[.*?\]").unwrap());

/// Trailing parenthetical, ASCII or full-width: "Hello (你好)", "Hello （你好）"
pub static BRACKET_TRANSLATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*[（(]([^）)]+)[）)]\s*$").unwrap());

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Trim whitespace and byte order marks. Files saved with a UTF-8 BOM keep it
/// through `read_to_string`, where it would hide the first line's timestamp.
pub fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Remove every word-timing annotation and trim the result.
pub fn strip_word_timing(line: &str) -> String {
    WORD_TIMING_ANNOTATION.replace_all(line, "").trim().to_string()
}

/// Remove one leading `[...]` prefix (timestamp or tag) and trim.
pub fn strip_leading_bracket(line: &str) -> &str {
    match LEADING_BRACKET.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line,
    }
}

/// Text shown for a line in static mode: the line minus a word-timed prefix.
pub fn static_text(line: &str) -> &str {
    match WORD_TIMED_PREFIX.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line,
    }
}

/// True if the text holds at least one CJK unified ideograph.
pub fn contains_cjk(s: &str) -> bool {
    s.chars()
        .any(|c| matches!(c as u32, 0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF))
}

/// Convert a `[mm:ss.fff]` capture set to seconds.
/// The fraction is read as a decimal suffix, so ".5" is 0.5s and ".05" is 0.05s.
pub fn standard_seconds(minutes: &str, seconds: &str, fraction: Option<&str>) -> Option<f64> {
    let mm: u32 = minutes.parse().ok()?;
    let ss: u32 = seconds.parse().ok()?;
    let frac = match fraction {
        Some(f) => format!("0.{}", f).parse::<f64>().ok()?,
        None => 0.0,
    };
    Some(mm as f64 * 60.0 + ss as f64 + frac)
}

/// Split a run of leading standard timestamps off a line.
/// "[00:01.00][00:05.00]text" → ([1.0, 5.0], "text")
pub fn split_standard_timestamps(line: &str) -> (Vec<f64>, &str) {
    let mut times = Vec::new();
    let mut rest = line;
    while let Some(caps) = STANDARD_TIMESTAMP.captures(rest) {
        let Some(time) = standard_seconds(
            &caps[1],
            &caps[2],
            caps.get(3).map(|m| m.as_str()),
        ) else {
            break;
        };
        let consumed = caps[0].len();
        times.push(time);
        rest = &rest[consumed..];
    }
    (times, rest.trim())
}

/// Build the case-insensitive credit matcher from a keyword vocabulary:
/// `^(?:kw1|kw2|...)\s*[:：]`. Longer keywords are tried first.
pub fn build_credit_pattern<S: AsRef<str>>(keywords: &[S]) -> Result<Regex> {
    let mut words: Vec<&str> = keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .collect();
    if words.is_empty() {
        bail!("Credit keyword list must not be empty");
    }
    words.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    words.dedup();

    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&format!(r"(?i)^(?:{})\s*[:：]", alternation))?)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_line() {
        assert_eq!(trim_line("\u{feff}[00:01.00]x \r"), "[00:01.00]x");
        assert_eq!(trim_line(" \u{feff} "), "");
        assert_eq!(trim_line("plain"), "plain");
    }

    #[test]
    fn test_strip_word_timing() {
        assert_eq!(strip_word_timing("[1000,1500]Hi(0,200)(200,300)"), "[1000,1500]Hi");
        assert_eq!(strip_word_timing("(1520,310,0)我(1830,200,0)们"), "我们");
        // Non-numeric parentheses are content
        assert_eq!(strip_word_timing("Hello (World)"), "Hello (World)");
    }

    #[test]
    fn test_strip_leading_bracket() {
        assert_eq!(strip_leading_bracket("[00:00.00] 作词：张三"), "作词：张三");
        assert_eq!(strip_leading_bracket("Lyricist: John"), "Lyricist: John");
    }

    #[test]
    fn test_static_text() {
        assert_eq!(static_text("[1000,200]hello"), "hello");
        assert_eq!(static_text("[00:01.00]hello"), "[00:01.00]hello");
    }

    #[test]
    fn test_contains_cjk() {
        assert!(contains_cjk("你好"));
        assert!(contains_cjk("Hello 世界"));
        assert!(!contains_cjk("World"));
        // Hiragana/Hangul alone are not ideographs
        assert!(!contains_cjk("こんにちは"));
        assert!(!contains_cjk("안녕"));
    }

    #[test]
    fn test_standard_seconds() {
        let t = standard_seconds("01", "23", Some("45")).unwrap();
        assert!((t - 83.45).abs() < 1e-9);
        assert_eq!(standard_seconds("00", "10", None), Some(10.0));
        let t = standard_seconds("00", "01", Some("5")).unwrap();
        assert!((t - 1.5).abs() < 1e-9);
        let t = standard_seconds("00", "01", Some("050")).unwrap();
        assert!((t - 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_split_standard_timestamps() {
        let (times, rest) = split_standard_timestamps("[00:01.00][00:05.50]text");
        assert_eq!(times, vec![1.0, 5.5]);
        assert_eq!(rest, "text");

        let (times, rest) = split_standard_timestamps("[1:00]text");
        assert!(times.is_empty());
        assert_eq!(rest, "[1:00]text");

        // Full-width digits are not timestamps
        let (times, _) = split_standard_timestamps("[０１:２３]x");
        assert!(times.is_empty());
    }

    #[test]
    fn test_credit_pattern() {
        let re = build_credit_pattern(&["作词", "Lyricist", "Mix", "Mixing"]).unwrap();
        assert!(re.is_match("作词：张三"));
        assert!(re.is_match("作词 : 张三"));
        assert!(re.is_match("lyricist: John"));
        assert!(re.is_match("MIXING：Someone"));
        assert!(!re.is_match("Lyricist John"));
        assert!(!re.is_match("The lyricist: John"));
    }

    #[test]
    fn test_credit_pattern_escapes_keywords() {
        let re = build_credit_pattern(&["词 / 曲", "a.b"]).unwrap();
        assert!(re.is_match("词 / 曲：某人"));
        assert!(!re.is_match("axb: x"));
    }

    #[test]
    fn test_credit_pattern_rejects_empty() {
        assert!(build_credit_pattern::<&str>(&[]).is_err());
        assert!(build_credit_pattern(&["  "]).is_err());
    }
}
