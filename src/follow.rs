//! Caller-held playback following.
//!
//! The resolver has no memory; `LineFollower` keeps the last answer so a UI
//! only redraws or scrolls when the active line actually changes.

use crate::models::ParsedLyrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct LineFollower {
    last: Option<usize>,
}

impl LineFollower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<usize> {
        self.last
    }

    /// Resolve the active line at `time`; returns `Some` only on a change.
    pub fn update(&mut self, lyrics: &ParsedLyrics, time: f64) -> Option<ActiveChange> {
        let current = lyrics.active_line(time);
        if current == self.last {
            return None;
        }
        let change = ActiveChange {
            previous: self.last,
            current,
        };
        self.last = current;
        Some(change)
    }

    /// Forget the last index, e.g. when the song changes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
