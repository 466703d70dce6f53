//! Human-readable text output formatter

use super::OutputFormatter;
use crate::diagnostic::{Diagnostic, Severity};
use crate::engine::LintResult;
use colored::*;
use std::collections::BTreeMap;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show source context
    pub show_source: bool,

    /// Show help text
    pub show_help: bool,

    /// Show fix suggestions
    pub show_fixes: bool,

    /// Show statistics
    pub show_stats: bool,

    /// Show context lines before/after
    pub show_context: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_source: true,
            show_help: true,
            show_fixes: true,
            show_stats: true,
            show_context: true,
        }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.colored {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn severity_str(&self, severity: Severity) -> ColoredString {
        let s = format!("{}", severity);
        if !self.colored {
            return s.normal();
        }
        match severity {
            Severity::Error => s.red().bold(),
            Severity::Warning => s.yellow().bold(),
            Severity::Info => s.blue(),
        }
    }

    fn gutter(&self) -> String {
        self.paint("|", |s| s.blue())
    }

    fn context_line(&self, output: &mut String, line_num: usize, line: &str) {
        output.push_str(&format!(
            "{} {} {}\n",
            self.paint(&format!("{:>4}", line_num), |s| s.dimmed()),
            self.gutter(),
            self.paint(line, |s| s.dimmed())
        ));
    }

    fn plural(count: usize, one: &str, many: &str) -> String {
        format!("{} {}", count, if count == 1 { one } else { many })
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        let mut by_file: BTreeMap<_, Vec<_>> = BTreeMap::new();
        for diag in &result.diagnostics {
            by_file.entry(&diag.location.file).or_default().push(diag);
        }

        for (file, diagnostics) in &by_file {
            let name = file.display().to_string();
            output.push_str(&format!("{}\n", self.paint(&name, |s| s.underline())));
            for diag in diagnostics {
                output.push_str(&self.format_diagnostic(diag));
                output.push('\n');
            }
        }

        if self.show_stats {
            output.push_str(&format!(
                "{} processed",
                Self::plural(result.files_processed, "file", "files")
            ));

            let mut counts = Vec::new();
            if result.error_count > 0 {
                let s = Self::plural(result.error_count, "error", "errors");
                counts.push(self.paint(&s, |s| s.red()));
            }
            if result.warning_count > 0 {
                let s = Self::plural(result.warning_count, "warning", "warnings");
                counts.push(self.paint(&s, |s| s.yellow()));
            }
            if result.info_count > 0 {
                let s = Self::plural(result.info_count, "info", "infos");
                counts.push(self.paint(&s, |s| s.blue()));
            }
            if !counts.is_empty() {
                output.push_str(&format!(": {}", counts.join(", ")));
            }
            output.push('\n');

            output.push_str(&format!(
                "Finished in {:.2}s\n",
                result.duration.as_secs_f64()
            ));
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}:{}:{}: {}[{}]: {}\n",
            diag.location.file.display(),
            diag.location.line,
            diag.location.column,
            self.severity_str(diag.severity),
            self.paint(&diag.rule_id, |s| s.cyan()),
            diag.message
        ));

        if self.show_source {
            if let Some(source) = &diag.source_line {
                output.push_str(&format!("     {}\n", self.gutter()));

                if self.show_context {
                    for (line_num, line) in &diag.context_before {
                        self.context_line(&mut output, *line_num, line);
                    }
                }

                output.push_str(&format!(
                    "{} {} {}\n",
                    self.paint(&format!("{:>4}", diag.location.line), |s| s.blue()),
                    self.gutter(),
                    source
                ));

                // Source lines are shown with tabs expanded, so the caret
                // lines up with the reported column
                if diag.location.column > 0 {
                    let padding = " ".repeat(diag.location.column - 1);
                    let underline = "^".repeat(diag.location.length.max(1));
                    output.push_str(&format!(
                        "     {} {}{}\n",
                        self.gutter(),
                        padding,
                        self.paint(&underline, |s| s.red())
                    ));
                }

                if self.show_context {
                    for (line_num, line) in &diag.context_after {
                        self.context_line(&mut output, *line_num, line);
                    }
                }
            }
        }

        if self.show_help {
            if let Some(help) = &diag.help {
                output.push_str(&format!(
                    "     {} help: {}\n",
                    self.paint("=", |s| s.blue()),
                    help
                ));
            }
        }

        if self.show_fixes {
            if let Some(fix) = &diag.fix {
                output.push_str(&format!(
                    "     {} fix ({}): {}\n",
                    self.paint("=", |s| s.green()),
                    fix.safety,
                    self.paint(&fix.description, |s| s.green())
                ));
            }
        }

        output
    }
}
