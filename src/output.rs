//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Diagnostics go through the
//! logger instead; this module is only the user-facing summary.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Pages
//! 001 a.md (120 bytes)
//! 002 guide/index.md (80 bytes)
//!
//! Navigation
//! /
//!     001 a → /a.html
//!     002 guide → /guide/
//! guide/
//!     001 install → /guide/install.html
//! ```
//!
//! ## Build
//!
//! ```text
//! Rendered
//! 001 a.html
//! 002 guide/index.html
//!
//! Failed
//!     failed to read /src/b.md: permission denied
//!
//! Rendered 2 files, 1 failure
//! ```

use crate::generate::RenderReport;
use crate::navigation::NavigationIndex;
use crate::paths::url_path;
use crate::scan::PageSource;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` below `root`, `/`-separated, or the full path if outside it.
fn display_relative(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => url_path(rel),
        Err(_) => path.display().to_string(),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_pages(pages: &[PageSource], input_root: &Path) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    if pages.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, page) in pages.iter().enumerate() {
        lines.push(format!(
            "{} {} ({} bytes)",
            format_index(i + 1),
            display_relative(input_root, &page.path),
            page.size
        ));
    }
    lines
}

pub fn format_navigation(nav: &NavigationIndex) -> Vec<String> {
    let mut lines = vec!["Navigation".to_string()];
    for menu in nav.menus() {
        let dir = display_relative(nav.output_root(), &menu.directory);
        lines.push(if dir.is_empty() {
            "/".to_string()
        } else {
            format!("{dir}/")
        });
        for (i, entry) in menu.entries.iter().enumerate() {
            lines.push(format!(
                "{}{} {} → {}",
                indent(1),
                format_index(i + 1),
                entry.title,
                entry.link
            ));
        }
    }
    lines
}

/// Navigation menus as pretty-printed JSON.
pub fn navigation_json(nav: &NavigationIndex) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(nav.menus())
}

pub fn print_check_output(pages: &[PageSource], nav: &NavigationIndex, input_root: &Path) {
    for line in format_pages(pages, input_root) {
        println!("{}", line);
    }
    println!();
    for line in format_navigation(nav) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_report(report: &RenderReport, output_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.rendered.is_empty() {
        lines.push("Rendered".to_string());
        for (i, path) in report.rendered.iter().enumerate() {
            lines.push(format!(
                "{} {}",
                format_index(i + 1),
                display_relative(output_root, path)
            ));
        }
        lines.push(String::new());
    }

    if !report.failures.is_empty() {
        lines.push("Failed".to_string());
        for failure in &report.failures {
            lines.push(format!("{}{}", indent(1), failure));
        }
        lines.push(String::new());
    }

    let mut summary = format!("Rendered {}", plural(report.rendered.len(), "file"));
    if !report.failures.is_empty() {
        summary.push_str(&format!(", {}", plural(report.failures.len(), "failure")));
    }
    lines.push(summary);
    lines
}

pub fn print_build_output(report: &RenderReport, output_root: &Path) {
    for line in format_report(report, output_root) {
        println!("{}", line);
    }
}
