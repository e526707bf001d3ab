//! Lyrics synchronization engine - shared modules for all binaries.

pub mod batch;
pub mod config;
pub mod follow;
pub mod models;
pub mod normalize;
pub mod parser;
pub mod progress;
pub mod resolve;
pub mod safety;
pub mod source;
pub mod translation;

pub use config::LyricsConfig;
pub use follow::{ActiveChange, LineFollower};
pub use models::{LyricLine, ParsedLyrics};
pub use parser::{parse_lyrics, LyricsEngine};
pub use resolve::{resolve_active_line, seek_target};
pub use source::LyricSource;
