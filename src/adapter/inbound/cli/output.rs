//! Terminal output for CLI handlers.
//!
//! Every helper has two renderings: colored text for people, and one JSON
//! object per line (`{"type": ..., "payload": ...}`) when `--json` is set.
//! Quiet mode drops the text rendering of everything except warnings and
//! errors.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::{json, Value};

/// Output flags taken from the global CLI arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Machine-readable JSON lines instead of text.
    pub json: bool,
    /// Suppress non-essential text.
    pub quiet: bool,
    /// Count of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn current() -> OutputConfig {
    match cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Install the output flags. Call once, before any handler runs.
pub fn configure(config: OutputConfig) {
    match cell().write() {
        Ok(mut slot) => *slot = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn is_quiet() -> bool {
    current().quiet
}

#[must_use]
pub fn verbosity() -> u8 {
    current().verbose
}

fn json_line(kind: &str, payload: Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

/// Route one message: JSON line, text, or nothing in quiet mode.
fn emit(kind: &str, payload: Value, text: impl FnOnce()) {
    let config = current();
    if config.json {
        json_line(kind, payload);
    } else if !config.quiet {
        text();
    }
}

/// Print the tool name and version.
pub fn header(version: &str) {
    emit(
        "header",
        json!({ "app": env!("CARGO_PKG_NAME"), "version": version }),
        || {
            println!("{} {}", env!("CARGO_PKG_NAME").bold(), version.dimmed());
            println!();
        },
    );
}

/// Print a bold section title.
pub fn section(title: &str) {
    emit("section", json!({ "title": title }), || {
        println!();
        println!("{}", title.bold());
    });
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        json!({ "label": label, "value": value }),
        || println!("  {:<20} {}", label.dimmed(), value),
    );
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), || {
        println!("  {} {}", "✓".green(), message);
    });
}

/// Print a warning; shown in quiet mode too.
pub fn warning(message: &str) {
    if is_json() {
        json_line("warning", json!({ "message": message }));
    } else {
        println!("  {} {}", "⚠".yellow(), message);
    }
}

/// Print an error to stderr; shown in quiet mode too.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

pub fn note(message: &str) {
    emit("note", json!({ "message": message }), || {
        println!("  {}", message.dimmed());
    });
}

/// Print a `hint:` line.
pub fn hint(message: &str) {
    emit("hint", json!({ "message": message }), || {
        println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
    });
}

/// Print pre-rendered text such as a table, indented.
pub fn lines(content: &str) {
    emit("lines", json!({ "content": content }), || {
        for line in content.lines() {
            println!("  {line}");
        }
    });
}

/// Print a command's result document as a single JSON line.
pub fn json_output(value: &impl Serialize) {
    match serde_json::to_string(value) {
        Ok(text) => println!("{text}"),
        Err(e) => error(&format!("failed to serialize output: {e}")),
    }
}

/// Cyan, unless JSON mode is on.
pub fn highlight(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    value.cyan().to_string()
}

/// Dimmed, unless JSON mode is on.
pub fn muted(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    value.dimmed().to_string()
}
