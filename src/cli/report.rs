//! Report formatting and printing.
//!
//! Pretty mode prints diagnostics in cargo-style format; `--json` prints the
//! whole [`CheckResult`] for machine consumers. Separate from core logic so
//! rescheck can be used as a library.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::diagnostics::{CheckResult, Diagnostic, Level};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print the pretty report to stdout.
pub fn print(result: &CheckResult) {
    report_to(result, &mut io::stdout().lock());
}

/// Print the whole result as JSON to stdout.
pub fn print_json(result: &CheckResult) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, result)?;
    writeln!(stdout)?;
    Ok(())
}

/// Print the pretty report to a custom writer. Useful for testing.
pub fn report_to<W: Write>(result: &CheckResult, writer: &mut W) {
    if result.diagnostics.is_empty() {
        print_success_to(result.summary.externals, writer);
        return;
    }

    let mut sources = SourceCache::default();
    let max_line_width = result
        .diagnostics
        .iter()
        .map(|d| d.line)
        .max()
        .unwrap_or(1)
        .to_string()
        .len();

    for diagnostic in &result.diagnostics {
        print_diagnostic(diagnostic, &mut sources, writer, max_line_width);
    }
    print_summary(result, writer);
}

fn print_success_to<W: Write>(externals: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} {} - no issues found",
            externals,
            if externals == 1 { "external" } else { "externals" }
        )
        .green()
    );
}

fn print_diagnostic<W: Write>(
    diagnostic: &Diagnostic,
    sources: &mut SourceCache,
    writer: &mut W,
    max_line_width: usize,
) {
    let severity = match diagnostic.level {
        Level::Error => "error".bold().red(),
        Level::Warning => "warning".bold().yellow(),
        Level::Info => "info".bold().blue(),
    };
    match &diagnostic.code {
        Some(code) => {
            let _ = writeln!(
                writer,
                "{}: {}  {}",
                severity,
                diagnostic.message,
                code.dimmed().cyan()
            );
        }
        None => {
            let _ = writeln!(writer, "{}: {}", severity, diagnostic.message);
        }
    }

    // Clickable location: --> path:line:col
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        diagnostic.file,
        diagnostic.line,
        diagnostic.column
    );

    if let Some(source_line) = sources.line(&diagnostic.file, diagnostic.line) {
        let caret = match diagnostic.level {
            Level::Error => "^".red(),
            Level::Warning => "^".yellow(),
            Level::Info => "^".blue(),
        };

        let _ = writeln!(writer, "{:>width$} {}", "", "|".blue(), width = max_line_width);
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            diagnostic.line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // Caret aligned to the column by display width (col is 1-based).
        let prefix: String = source_line
            .chars()
            .take(diagnostic.column.saturating_sub(1))
            .collect();
        let padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret,
            width = max_line_width,
            padding = padding
        );
    }

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(result: &CheckResult, writer: &mut W) {
    let errors = result.summary.errors;
    let warnings = result.summary.warnings;
    let problems = errors + warnings;
    if problems == 0 {
        return;
    }
    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        problems,
        errors,
        if errors == 1 { "error" } else { "errors" }.red(),
        warnings,
        if warnings == 1 { "warning" } else { "warnings" }.yellow()
    );
}

/// Best-effort source context: the report re-reads files to show the
/// offending line; a missing or changed file just omits it.
#[derive(Default)]
struct SourceCache {
    files: HashMap<String, Option<Vec<String>>>,
}

impl SourceCache {
    fn line(&mut self, file: &str, line: usize) -> Option<String> {
        let lines = self.files.entry(file.to_string()).or_insert_with(|| {
            fs::read_to_string(file)
                .ok()
                .map(|text| text.lines().map(str::to_string).collect())
        });
        lines.as_ref()?.get(line.checked_sub(1)?).cloned()
    }
}
