//! Compact output formatter
//!
//! One line per diagnostic, minimal output for scripting.

use super::OutputFormatter;
use crate::diagnostic::Diagnostic;
use crate::engine::LintResult;

/// Compact one-line-per-finding formatter
pub struct CompactFormatter {
    /// Show severity prefix
    pub show_severity: bool,
    /// Show rule ID
    pub show_rule: bool,
}

impl CompactFormatter {
    pub fn new() -> Self {
        Self {
            show_severity: true,
            show_rule: true,
        }
    }

    /// Hide severity prefix
    pub fn without_severity(mut self) -> Self {
        self.show_severity = false;
        self
    }

    /// Hide rule ID
    pub fn without_rule(mut self) -> Self {
        self.show_rule = false;
        self
    }
}

impl Default for CompactFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for CompactFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();
        for diag in &result.diagnostics {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }
        output
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut parts = vec![format!(
            "{}:{}:{}",
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.location.column
        )];
        if self.show_severity {
            parts.push(diagnostic.severity.to_string());
        }
        if self.show_rule {
            parts.push(diagnostic.rule_id.clone());
        }
        parts.push(diagnostic.message.clone());
        parts.join(": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Location, Severity};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn column_diag(line: usize) -> Diagnostic {
        Diagnostic::new(
            "column",
            Severity::Warning,
            "`b` must appear in column 5, not 3",
            Location::new(PathBuf::from("Call.java"), line, 3),
        )
    }

    #[test]
    fn test_compact_format() {
        let output = CompactFormatter::new().format_diagnostic(&column_diag(2));
        assert_eq!(
            output,
            "Call.java:2:3: warning: column: `b` must appear in column 5, not 3"
        );
    }

    #[test]
    fn test_compact_minimal() {
        let formatter = CompactFormatter::new().without_severity().without_rule();
        let output = formatter.format_diagnostic(&column_diag(2));
        assert_eq!(output, "Call.java:2:3: `b` must appear in column 5, not 3");
    }

    #[test]
    fn test_compact_result() {
        let result = LintResult {
            diagnostics: vec![column_diag(2), column_diag(7)],
            files_processed: 1,
            warning_count: 2,
            ..Default::default()
        };

        let output = CompactFormatter::new().format(&result);
        assert_eq!(output.lines().count(), 2);
    }
}
