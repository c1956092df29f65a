//! Diagnostic types shared by the library and the CLI.
//!
//! The record shape is stable for machine consumers:
//! `{ level, message, file, line, column, code? }`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Info => write!(f, "info"),
        }
    }
}

/// One reported problem, anchored to a 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    /// Stable rule code, e.g. `type-mismatch`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diagnostic {
    pub fn error(
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::new(Level::Error, message, file, line, column)
    }

    pub fn warning(
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::new(Level::Warning, message, file, line, column)
    }

    pub fn new(
        level: Level,
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            file: file.into(),
            line,
            column,
            code: None,
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }
}

/// Aggregate counts for one check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    /// Externals scanned, whether or not they produced diagnostics.
    pub externals: usize,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub summary: CheckSummary,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    /// Assemble a result, counting error- and warning-level diagnostics.
    pub fn summarize(externals: usize, diagnostics: Vec<Diagnostic>) -> Self {
        let errors = diagnostics
            .iter()
            .filter(|d| d.level == Level::Error)
            .count();
        let warnings = diagnostics
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count();
        Self {
            summary: CheckSummary {
                externals,
                errors,
                warnings,
            },
            diagnostics,
        }
    }
}

/// Sort key: file, then line, then column, then message.
pub fn compare(a: &Diagnostic, b: &Diagnostic) -> std::cmp::Ordering {
    a.file
        .cmp(&b.file)
        .then_with(|| a.line.cmp(&b.line))
        .then_with(|| a.column.cmp(&b.column))
        .then_with(|| a.message.cmp(&b.message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_counts_levels() {
        let result = CheckResult::summarize(
            3,
            vec![
                Diagnostic::error("boom", "a.res", 1, 1),
                Diagnostic::warning("hmm", "a.res", 2, 1),
                Diagnostic::warning("hmm again", "b.res", 1, 1),
            ],
        );
        assert_eq!(result.summary.externals, 3);
        assert_eq!(result.summary.errors, 1);
        assert_eq!(result.summary.warnings, 2);
    }

    #[test]
    fn level_display() {
        assert_eq!(Level::Error.to_string(), "error");
        assert_eq!(Level::Warning.to_string(), "warning");
        assert_eq!(Level::Info.to_string(), "info");
    }

    #[test]
    fn json_shape_is_stable() {
        let diag = Diagnostic::error("msg", "a.res", 3, 7).with_code("type-mismatch");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["line"], 3);
        assert_eq!(json["column"], 7);
        assert_eq!(json["code"], "type-mismatch");

        let plain = serde_json::to_value(Diagnostic::warning("w", "a.res", 1, 1)).unwrap();
        assert!(plain.get("code").is_none());
    }

    #[test]
    fn compare_orders_by_position() {
        let a = Diagnostic::error("x", "a.res", 2, 1);
        let b = Diagnostic::error("x", "a.res", 10, 1);
        let c = Diagnostic::error("x", "b.res", 1, 1);
        assert_eq!(compare(&a, &b), std::cmp::Ordering::Less);
        assert_eq!(compare(&b, &c), std::cmp::Ordering::Less);
    }
}
