use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use lyrics_sync::batch::run_batch;
use lyrics_sync::progress::{format_duration, init_tracing, set_log_only};
use lyrics_sync::safety::validate_output_path;
use lyrics_sync::source::discover_translation;
use lyrics_sync::{LyricSource, LyricsConfig, LyricsEngine, ParsedLyrics};

#[derive(Parser, Debug)]
#[command(name = "lyrics-sync")]
#[command(about = "Parse timed lyrics, merge translations, and resolve the active line")]
struct Cli {
    /// Engine config (TOML): durations, credit keywords, tag vocabularies
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one lyric file and print (or write) the result as JSON
    Parse(ParseArgs),

    /// Print the line active at a playback position
    Active(ActiveArgs),

    /// Convert every lyric file in a directory, in parallel
    Batch(BatchArgs),
}

#[derive(Parser, Debug, Clone)]
struct InputArgs {
    /// Lyric file (.lrc / .yrc), or a NetEase lyric JSON response with --netease
    input: PathBuf,

    /// Separate translation file (default: sibling <stem>.trans.lrc / <stem>.tlrc)
    #[arg(short, long)]
    translation: Option<PathBuf>,

    /// Treat the input as a NetEase /lyric/new JSON response
    #[arg(long)]
    netease: bool,
}

#[derive(Parser, Debug)]
struct ParseArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output JSON file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ActiveArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Playback position in seconds
    #[arg(long, allow_hyphen_values = true)]
    time: f64,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    input_dir: PathBuf,

    output_dir: PathBuf,

    #[arg(long, default_value = "0")]
    workers: usize,

    /// Hide progress bars and log progress lines instead
    #[arg(long)]
    log_only: bool,
}

fn build_engine(config: Option<&Path>) -> Result<LyricsEngine> {
    match config {
        Some(path) => {
            let config = LyricsConfig::load(path)?;
            tracing::info!(config = %path.display(), "Loaded lyrics config");
            LyricsEngine::new(config)
        }
        None => Ok(LyricsEngine::default_engine().clone()),
    }
}

fn load_source(args: &InputArgs, engine: &LyricsEngine) -> Result<LyricSource> {
    if args.netease {
        let raw = std::fs::read_to_string(&args.input)
            .with_context(|| format!("Failed to read '{}'", args.input.display()))?;
        let value: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON in '{}'", args.input.display()))?;
        let Some(mut source) = LyricSource::from_netease_json_with(&value, engine) else {
            bail!("No lyric body in '{}'", args.input.display());
        };
        if let Some(path) = &args.translation {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read translation '{}'", path.display()))?;
            source = LyricSource::new(source.primary, Some(text));
        }
        return Ok(source);
    }

    let translation = args
        .translation
        .clone()
        .or_else(|| discover_translation(&args.input));
    if let Some(path) = &translation {
        tracing::debug!(translation = %path.display(), "Using translation file");
    }
    LyricSource::load(&args.input, translation.as_deref())
}

fn parse_input(args: &InputArgs, engine: &LyricsEngine) -> Result<ParsedLyrics> {
    let source = load_source(args, engine)?;
    Ok(source.parse_with(engine))
}

fn run_parse(args: ParseArgs, engine: &LyricsEngine) -> Result<()> {
    let parsed = parse_input(&args.input, engine)?;
    let json = serde_json::to_string_pretty(&parsed)?;

    match args.output {
        Some(output) => {
            let mut sources: Vec<&Path> = vec![args.input.input.as_path()];
            if let Some(t) = &args.input.translation {
                sources.push(t.as_path());
            }
            validate_output_path(&output, &sources)?;
            std::fs::write(&output, json)
                .with_context(|| format!("Failed to write '{}'", output.display()))?;
            tracing::info!(
                output = %output.display(),
                lines = parsed.len(),
                is_static = parsed.is_static,
                "Wrote parsed lyrics"
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_active(args: ActiveArgs, engine: &LyricsEngine) -> Result<()> {
    let parsed = parse_input(&args.input, engine)?;

    if parsed.is_static {
        println!("static");
        return Ok(());
    }

    match parsed.active_line(args.time) {
        Some(i) => {
            let line = &parsed.lines[i];
            println!(
                "[{}] {:.3}-{:.3} {}",
                i, line.start_time, line.end_time, line.text
            );
            if let Some(t) = &line.translation {
                println!("    {}", t);
            }
        }
        None => println!("none"),
    }
    Ok(())
}

fn run_batch_command(args: BatchArgs, engine: &LyricsEngine) -> Result<()> {
    set_log_only(args.log_only);

    if args.workers > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.workers)
            .build_global()
            .context("Failed to set thread pool size")?;
    }

    let stats = run_batch(&args.input_dir, &args.output_dir, engine)?;

    println!("\n{:=<60}", "");
    println!("Batch complete!");
    println!("  Files:  {}", stats.files);
    println!("  Timed:  {}", stats.timed);
    println!("  Static: {}", stats.static_files);
    println!("  Empty:  {}", stats.empty);
    println!("  Failed: {}", stats.failed);
    println!("  Lines:  {}", stats.total_lines);
    println!("{:=<60}", "");

    if stats.failed > 0 {
        for report in stats.reports.iter().filter(|r| r.error.is_some()) {
            eprintln!("  {}: {}", report.path, report.error.as_deref().unwrap_or(""));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing("info");

    let start = Instant::now();
    let engine = build_engine(cli.config.as_deref())?;

    match cli.cmd {
        Command::Parse(args) => run_parse(args, &engine)?,
        Command::Active(args) => run_active(args, &engine)?,
        Command::Batch(args) => run_batch_command(args, &engine)?,
    }

    tracing::debug!(elapsed = %format_duration(start.elapsed()), "Done");
    Ok(())
}
