//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, created variables
//! - Red: errors, deleted variables
//! - Yellow: warnings, updated variables
//! - Cyan: paths, keys, hints
//! - Dimmed: labels and secondary info

use colored::{ColoredString, Colorize};
use std::fmt::Display;

const RULE_WIDTH: usize = 56;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn paint(text: &str, style: fn(&str) -> ColoredString) -> String {
    if colors_enabled() {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Print a success message with checkmark.
///
/// Example: `✓ pulled 12 variables`
pub fn success(msg: &str) {
    println!("{} {}", paint("✓", |s| s.green()), msg);
}

/// Print an error message to stderr.
pub fn error(msg: &str) {
    eprintln!("{} {}", paint("✗", |s| s.red()), msg);
}

/// Print a warning message.
///
/// Example: `⚠ gitlab_variables.json now holds secret values`
pub fn warn(msg: &str) {
    println!("{} {}", paint("⚠", |s| s.yellow()), msg);
}

/// Print a hint message to stderr.
///
/// Example: `→ run: credder init`
pub fn hint(msg: &str) {
    eprintln!("{} {}", paint("→", |s| s.cyan()), paint(msg, |s| s.cyan()));
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  project:  4242`
pub fn kv(label: &str, value: impl Display) {
    let value = value.to_string();
    println!("  {}  {}", paint(label, |s| s.dimmed()), paint(&value, |s| s.bold()));
}

/// Print a list item with bullet.
pub fn list_item(item: &str) {
    println!("  • {}", item);
}

/// Print a section header with a separator line.
pub fn section(title: &str) {
    println!();
    println!("{}", paint(title, |s| s.bold()));
    println!("{}", paint(&"─".repeat(RULE_WIDTH), |s| s.dimmed()));
}

/// Print a dimmed/secondary message.
pub fn dimmed(msg: &str) {
    println!("{}", paint(msg, |s| s.dimmed()));
}

/// Print one change line: `+` create, `~` update, `-` delete.
///
/// Example: `+ DB_URL (production)`
pub fn change(marker: char, subject: &str, detail: Option<&str>) {
    let sign = marker.to_string();
    let sign = match marker {
        '+' => paint(&sign, |s| s.green()),
        '-' => paint(&sign, |s| s.red()),
        _ => paint(&sign, |s| s.yellow()),
    };

    match detail {
        Some(detail) => println!("{} {} {}", sign, subject, paint(detail, |s| s.dimmed())),
        None => println!("{} {}", sign, subject),
    }
}

/// Format a path in cyan.
pub fn path(p: &str) -> String {
    paint(p, |s| s.cyan())
}

/// Format a variable key in cyan.
pub fn key(k: &str) -> String {
    paint(k, |s| s.cyan())
}
