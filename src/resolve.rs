//! Active-line resolution.
//!
//! Stateless: every call recomputes from the line list. Callers that only want
//! to react to changes keep the previous index themselves (see `follow`).

use crate::models::{LyricLine, ParsedLyrics};

/// Index of the line active at `time` (seconds), or `None`.
///
/// The active line is the last non-meta line whose `start_time <= time`.
/// `lines` must be sorted by start time, as produced by the parser. Meta lines
/// are never returned. Negative and NaN times resolve to `None`.
pub fn resolve_active_line(lines: &[LyricLine], time: f64) -> Option<usize> {
    // NaN compares false, so it lands at 0 like a time before the first line
    let upper = lines.partition_point(|l| l.start_time <= time);
    lines[..upper].iter().rposition(|l| !l.is_meta)
}

/// Start time to seek to when the line at `index` is picked by the user.
pub fn seek_target(lines: &[LyricLine], index: usize) -> Option<f64> {
    lines
        .get(index)
        .filter(|l| !l.is_meta)
        .map(|l| l.start_time)
}

impl ParsedLyrics {
    /// Active line for a timed document. Always `None` in static mode.
    pub fn active_line(&self, time: f64) -> Option<usize> {
        if self.is_static {
            return None;
        }
        resolve_active_line(&self.lines, time)
    }

    /// Seek position for a picked line. Static lines have no position.
    pub fn seek_target(&self, index: usize) -> Option<f64> {
        if self.is_static {
            return None;
        }
        seek_target(&self.lines, index)
    }
}
