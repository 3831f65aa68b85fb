//! Terminal output with colored module prefixes.
//!
//! - `log!` / `debug!` print one `[module] message` line
//! - [`ProgressLine`] redraws a `[download] fonts(2/3)` line in place while
//!   worker threads report progress
//!
//! Lines for the `error` module go to stderr, everything else to stdout.

use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("fetch"; "{}", url);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, only shown with `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Print `[module] message`.
///
/// The current line is cleared first, so a message printed while a
/// [`ProgressLine`] is showing replaces it instead of being appended.
pub fn log(module: &str, message: &str) {
    let line = format!("{} {message}", colorize_prefix(module));

    if is_error(module) {
        let mut out = stderr().lock();
        writeln!(out, "{line}").ok();
        out.flush().ok();
    } else {
        let mut out = stdout().lock();
        execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        writeln!(out, "{line}").ok();
        out.flush().ok();
    }
}

fn is_error(module: &str) -> bool {
    module.eq_ignore_ascii_case("error")
}

fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "fetch" | "download" => prefix.bright_blue().bold().to_string(),
        "done" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

/// Single counter redrawn in place, safe to bump from rayon workers.
///
/// ```ignore
/// let progress = ProgressLine::new("download", "fonts", 3);
/// progress.inc();
/// progress.finish(); // keeps the final line
/// ```
pub struct ProgressLine {
    module: &'static str,
    label: &'static str,
    total: usize,
    done: AtomicUsize,
    draw: Mutex<()>,
}

impl ProgressLine {
    pub fn new(module: &'static str, label: &'static str, total: usize) -> Self {
        let progress = Self {
            module,
            label,
            total,
            done: AtomicUsize::new(0),
            draw: Mutex::new(()),
        };
        progress.redraw(0, false);
        progress
    }

    /// Count one finished item.
    ///
    /// A worker that finds another one drawing skips its own redraw; the
    /// next redraw or `finish` shows the newer count.
    pub fn inc(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(_guard) = self.draw.try_lock() {
            self.redraw(done, false);
        }
    }

    /// Draw the final count and move to the next line.
    pub fn finish(self) {
        let _guard = self.draw.lock();
        self.redraw(self.done.load(Ordering::Relaxed), true);
    }

    fn line(&self, done: usize) -> String {
        format!(
            "{} {}({done}/{})",
            colorize_prefix(self.module),
            self.label,
            self.total
        )
    }

    /// Caller must hold `draw`.
    fn redraw(&self, done: usize, newline: bool) {
        let mut out = stdout().lock();
        execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        write!(out, "{}", self.line(done)).ok();
        if newline {
            writeln!(out).ok();
        }
        out.flush().ok();
    }
}
