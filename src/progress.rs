//! Tracing setup and batch progress reporting.
//!
//! Batch runs show an indicatif bar by default. With `--log-only` the bar is
//! hidden and progress goes through `tracing` every few hundred files, which
//! reads better when output is piped to a file.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

static LOG_ONLY: AtomicBool = AtomicBool::new(false);

const BAR_TEMPLATE: &str =
    "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, ETA: {eta})";

pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// "350ms", "4.2s", "1.5m"
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

/// Progress for a parallel batch: a bar, or periodic log lines in log-only mode.
/// Safe to tick from rayon workers.
pub struct BatchProgress {
    bar: ProgressBar,
    done: AtomicU64,
    total: u64,
    log_every: u64,
    log_only: bool,
}

impl BatchProgress {
    /// Bar or log lines depending on the global `--log-only` setting.
    pub fn new(total: u64, message: &str, log_every: u64) -> Self {
        Self::with_mode(total, message, log_every, is_log_only())
    }

    pub fn with_mode(total: u64, message: &str, log_every: u64, log_only: bool) -> Self {
        let bar = ProgressBar::new(total);
        if log_only {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            let style = ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> ");
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        Self {
            bar,
            done: AtomicU64::new(0),
            total,
            log_every: log_every.max(1),
            log_only,
        }
    }

    /// Record one finished file. Returns the running count.
    pub fn tick(&self) -> u64 {
        self.bar.inc(1);
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if self.log_only && (done % self.log_every == 0 || done == self.total) {
            let pct = 100.0 * done as f64 / self.total.max(1) as f64;
            tracing::info!(done, total = self.total, "progress {:.1}%", pct);
        }
        done
    }

    pub fn is_log_only(&self) -> bool {
        self.log_only
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    pub fn finish(&self, message: String) {
        self.bar.finish_with_message(message);
    }
}
