//! GitHub Actions output formatter
//!
//! Outputs diagnostics in GitHub Actions workflow command format:
//! ::warning file={name},line={line},col={col}::{message}

use super::OutputFormatter;
use crate::diagnostic::{Diagnostic, Severity};
use crate::engine::LintResult;

/// Formatter for GitHub Actions annotations
pub struct GithubFormatter {
    /// Whether to include summary
    pub show_summary: bool,
}

impl GithubFormatter {
    pub fn new() -> Self {
        Self { show_summary: true }
    }

    /// Disable summary output
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }
}

impl Default for GithubFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl OutputFormatter for GithubFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        for diag in &result.diagnostics {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }

        if self.show_summary && !result.diagnostics.is_empty() {
            output.push_str(&format!(
                "::notice::Layout check complete: {} error(s), {} warning(s), {} info(s) in {} file(s)\n",
                result.error_count, result.warning_count, result.info_count, result.files_processed
            ));
        }

        output
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let level = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "notice",
        };

        // GitHub requires line and col >= 1; load errors carry 0
        format!(
            "::{} file={},line={},col={},title={}::{}",
            level,
            diagnostic.location.file.display(),
            diagnostic.location.line.max(1),
            diagnostic.location.column.max(1),
            diagnostic.rule_id,
            escape(&diagnostic.message)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Location;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn make_diagnostic(severity: Severity, rule: &str, line: usize, msg: &str) -> Diagnostic {
        Diagnostic::new(
            rule,
            severity,
            msg,
            Location::new(PathBuf::from("src/Main.java"), line, 5),
        )
    }

    #[test]
    fn test_format_levels() {
        let formatter = GithubFormatter::new();
        let error = make_diagnostic(Severity::Error, "extra-token", 3, "extra token `;`");
        assert_eq!(
            formatter.format_diagnostic(&error),
            "::error file=src/Main.java,line=3,col=5,title=extra-token::extra token `;`"
        );

        let warning = make_diagnostic(Severity::Warning, "column", 4, "w");
        assert!(formatter.format_diagnostic(&warning).starts_with("::warning"));

        let info = make_diagnostic(Severity::Info, "column", 4, "i");
        assert!(formatter.format_diagnostic(&info).starts_with("::notice"));
    }

    #[test]
    fn test_escape_newlines() {
        let formatter = GithubFormatter::new();
        let diag = make_diagnostic(Severity::Error, "load-error", 0, "Line1\nLine2 100%");

        let output = formatter.format_diagnostic(&diag);
        assert!(output.contains("line=1,"));
        assert!(output.contains("Line1%0ALine2 100%25"));
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_format_result() {
        let result = LintResult {
            diagnostics: vec![
                make_diagnostic(Severity::Error, "missing-token", 1, "Error"),
                make_diagnostic(Severity::Warning, "must-wrap", 2, "Warning"),
            ],
            files_processed: 1,
            error_count: 1,
            warning_count: 1,
            ..Default::default()
        };

        let output = GithubFormatter::new().format(&result);
        assert!(output.contains("::error"));
        assert!(output.contains("::warning"));
        assert!(output.contains("::notice::Layout check complete: 1 error(s), 1 warning(s)"));
        assert!(!GithubFormatter::new().without_summary().format(&result).contains("::notice"));
    }
}
