//! Batch conversion of lyric files to JSON.
//!
//! Scans a directory for `.lrc` / `.yrc` files, parses each one (with its sibling
//! translation file, if any) in parallel, and writes `<stem>.lyrics.json` per
//! input plus a `stats.json` summary.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::models::{BatchStats, FileOutcome, FileReport};
use crate::parser::LyricsEngine;
use crate::progress::{format_duration, BatchProgress};
use crate::safety::validate_output_dir;
use crate::source::{is_translation_file, LyricSource};

/// File extensions picked up as primary lyric files.
pub const LYRIC_EXTENSIONS: &[&str] = &["lrc", "yrc"];

const LOG_INTERVAL: u64 = 500;

/// List primary lyric files in `dir` (non-recursive), sorted by path.
/// Translation files (`*.trans.lrc`, `*.tlrc`) are skipped.
pub fn collect_lyric_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || is_translation_file(&path) {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if LYRIC_EXTENSIONS.contains(&ext.as_str()) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Output path for one input: `<output_dir>/<stem>.lyrics.json`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("lyrics");
    output_dir.join(format!("{}.lyrics.json", stem))
}

fn process_file(path: &Path, output_dir: &Path, engine: &LyricsEngine) -> FileReport {
    let shown = path.display().to_string();
    match convert_file(path, output_dir, engine) {
        Ok(report) => report,
        Err(e) => {
            let message = format!("{:#}", e);
            tracing::warn!(path = %shown, error = %message, "Failed to convert lyrics");
            FileReport {
                path: shown,
                outcome: FileOutcome::Failed,
                lines: 0,
                meta_lines: 0,
                translated_lines: 0,
                has_translation_file: false,
                error: Some(message),
            }
        }
    }
}

fn convert_file(path: &Path, output_dir: &Path, engine: &LyricsEngine) -> Result<FileReport> {
    let source = LyricSource::load_with_sibling(path)?;
    let parsed = source.parse_with(engine);

    let outcome = if parsed.is_empty() {
        FileOutcome::Empty
    } else if parsed.is_static {
        FileOutcome::Static
    } else {
        FileOutcome::Timed
    };

    let output = output_path_for(path, output_dir);
    let json = serde_json::to_string_pretty(&parsed)?;
    std::fs::write(&output, json)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    Ok(FileReport {
        path: path.display().to_string(),
        outcome,
        lines: parsed.len(),
        meta_lines: parsed.meta_count(),
        translated_lines: parsed.translated_count(),
        has_translation_file: source.translation.is_some(),
        error: None,
    })
}

/// Convert every lyric file in `input_dir`. Per-file failures are recorded in
/// the stats rather than aborting the run.
pub fn run_batch(input_dir: &Path, output_dir: &Path, engine: &LyricsEngine) -> Result<BatchStats> {
    validate_output_dir(output_dir, input_dir)?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create '{}'", output_dir.display()))?;

    let start = Instant::now();
    let files = collect_lyric_files(input_dir)?;
    let total = files.len() as u64;
    tracing::info!(files = total, input = %input_dir.display(), "Starting batch");

    let progress = BatchProgress::new(total, "Parsing lyrics", LOG_INTERVAL);

    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| {
            let report = process_file(path, output_dir, engine);
            progress.tick();
            report
        })
        .collect();

    progress.finish(format!("Parsed {} files", reports.len()));

    let elapsed = start.elapsed();
    let stats = BatchStats::from_reports(reports, elapsed.as_secs_f64());

    let stats_path = output_dir.join("stats.json");
    std::fs::write(&stats_path, serde_json::to_string_pretty(&stats)?)
        .with_context(|| format!("Failed to write '{}'", stats_path.display()))?;

    tracing::info!(
        files = stats.files,
        timed = stats.timed,
        static_files = stats.static_files,
        empty = stats.empty,
        failed = stats.failed,
        elapsed = %format_duration(elapsed),
        "Batch complete"
    );
    Ok(stats)
}
