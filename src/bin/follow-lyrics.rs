//! Simulate playback over a lyric file and print every active-line change.
//! Usage: cargo run --bin follow-lyrics -- <file> [--from 0] [--to 240] [--step 0.1]

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use lyrics_sync::progress::init_tracing;
use lyrics_sync::source::discover_translation;
use lyrics_sync::{LineFollower, LyricSource, LyricsConfig, LyricsEngine};

#[derive(Parser)]
#[command(name = "follow-lyrics")]
#[command(about = "Step a simulated play-head through a lyric file and print line changes")]
struct Args {
    input: PathBuf,

    #[arg(short, long)]
    translation: Option<PathBuf>,

    #[arg(long)]
    config: Option<PathBuf>,

    /// Start position in seconds
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// End position in seconds (default: last line's end)
    #[arg(long)]
    to: Option<f64>,

    /// Tick interval in seconds
    #[arg(long, default_value_t = 0.1)]
    step: f64,
}

fn format_clock(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    format!(
        "{:02}:{:02}.{:03}",
        total_ms / 60_000,
        (total_ms / 1000) % 60,
        total_ms % 1000
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing("warn");

    if !(args.step > 0.0) {
        bail!("--step must be positive");
    }

    let engine = match &args.config {
        Some(path) => LyricsEngine::new(LyricsConfig::load(path)?)?,
        None => LyricsEngine::default_engine().clone(),
    };

    let translation = args
        .translation
        .clone()
        .or_else(|| discover_translation(&args.input));
    let source = LyricSource::load(&args.input, translation.as_deref())?;
    let lyrics = source.parse_with(&engine);

    if lyrics.is_empty() {
        println!("No lyrics.");
        return Ok(());
    }

    if lyrics.is_static {
        println!("Static lyrics ({} lines), nothing to follow:", lyrics.len());
        for line in &lyrics.lines {
            println!("  {}", line.text);
        }
        return Ok(());
    }

    for line in lyrics.lines.iter().filter(|l| l.is_meta) {
        println!("  [meta] {}", line.text);
    }

    let end = args.to.unwrap_or_else(|| {
        lyrics
            .lines
            .iter()
            .filter(|l| !l.is_meta)
            .map(|l| l.end_time)
            .fold(0.0, f64::max)
    });

    let mut follower = LineFollower::new();
    let mut tick: u64 = 0;
    let mut changes = 0;
    loop {
        let time = args.from + tick as f64 * args.step;
        if time > end {
            break;
        }
        if let Some(change) = follower.update(&lyrics, time) {
            changes += 1;
            match change.current {
                Some(i) => {
                    let line = &lyrics.lines[i];
                    match &line.translation {
                        Some(t) => println!("{} #{} {} / {}", format_clock(time), i, line.text, t),
                        None => println!("{} #{} {}", format_clock(time), i, line.text),
                    }
                }
                None => println!("{} (no active line)", format_clock(time)),
            }
        }
        tick += 1;
    }

    println!(
        "\n{} changes between {} and {}",
        changes,
        format_clock(args.from),
        format_clock(end)
    );
    Ok(())
}
