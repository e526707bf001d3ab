//! Lyric sources: files on disk and NetEase lyric API payloads.
//!
//! Shaping happens here, before parsing. NetEase word-timed bodies carry
//! credits as JSON object lines (`{"t":0,"c":[{"tx":"作词: "},{"tx":"张三"}]}`);
//! those are unpacked into plain credit lines so the parser can tag them.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::normalize::trim_line;
use crate::parser::LyricsEngine;

/// Suffixes tried when looking for a translation next to a lyric file.
pub const TRANSLATION_SUFFIXES: &[&str] = &["trans.lrc", "tlrc"];

/// Primary lyric text plus an optional separate translation document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LyricSource {
    pub primary: String,
    pub translation: Option<String>,
}

#[derive(Deserialize)]
struct JsonCreditLine {
    #[serde(default)]
    c: Vec<JsonCreditFragment>,
}

#[derive(Deserialize)]
struct JsonCreditFragment {
    #[serde(default)]
    tx: String,
}

impl LyricSource {
    pub fn new(primary: impl Into<String>, translation: Option<String>) -> Self {
        Self {
            primary: primary.into(),
            translation: translation.filter(|t| !trim_line(t).is_empty()),
        }
    }

    /// Parse this source with the given engine.
    pub fn parse_with(&self, engine: &LyricsEngine) -> crate::models::ParsedLyrics {
        engine.parse(&self.primary, self.translation.as_deref())
    }

    /// Read a lyric file and an optional translation file.
    pub fn load(path: &Path, translation_path: Option<&Path>) -> Result<Self> {
        let primary = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lyrics '{}'", path.display()))?;
        let translation = match translation_path {
            Some(p) => Some(
                std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read translation '{}'", p.display()))?,
            ),
            None => None,
        };
        Ok(Self::new(primary, translation))
    }

    /// Read a lyric file, picking up a sibling translation file if one exists.
    pub fn load_with_sibling(path: &Path) -> Result<Self> {
        let sibling = discover_translation(path);
        Self::load(path, sibling.as_deref())
    }

    /// Unpack a NetEase `/lyric/new` response with the default vocabulary.
    pub fn from_netease_json(value: &Value) -> Option<Self> {
        Self::from_netease_json_with(value, LyricsEngine::default_engine())
    }

    /// Unpack a NetEase `/lyric/new` response.
    ///
    /// Uses `lrc.lyric`, falling back to `yrc.lyric`; `tlyric.lyric` becomes the
    /// translation. Returns `None` when neither lyric body is present.
    pub fn from_netease_json_with(value: &Value, engine: &LyricsEngine) -> Option<Self> {
        let body = |key: &str| {
            value
                .get(key)
                .and_then(|v| v.get("lyric"))
                .and_then(Value::as_str)
                .filter(|s| !trim_line(s).is_empty())
        };
        let primary = body("lrc").or_else(|| body("yrc"))?;
        let translation = body("tlyric").map(str::to_string);

        let cleaned = primary
            .lines()
            .filter_map(|line| {
                let trimmed = trim_line(line);
                if trimmed.starts_with('{') {
                    unpack_json_credit(trimmed, engine)
                } else {
                    Some(line.to_string())
                }
            })
            .filter(|line| !trim_line(line).is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Some(Self::new(cleaned, translation))
    }
}

/// Join the `tx` fragments of a JSON credit line; keep it only if it reads as a credit.
fn unpack_json_credit(line: &str, engine: &LyricsEngine) -> Option<String> {
    let parsed: JsonCreditLine = serde_json::from_str(line).ok()?;
    let content = parsed
        .c
        .iter()
        .map(|f| f.tx.as_str())
        .collect::<String>()
        .trim()
        .to_string();
    engine.is_credit(&content).then_some(content)
}

/// Find `<stem>.trans.lrc` or `<stem>.tlrc` next to a lyric file.
pub fn discover_translation(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    TRANSLATION_SUFFIXES
        .iter()
        .map(|suffix| dir.join(format!("{}.{}", stem, suffix)))
        .find(|candidate| candidate.is_file() && candidate != path)
}

/// True for files that look like a translation rather than a primary lyric file.
pub fn is_translation_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    TRANSLATION_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(&format!(".{}", suffix)))
}
