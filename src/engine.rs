//! Core verification engine

use crate::column::expand_tabs;
use crate::config::{Config, ConfigError};
use crate::diagnostic::{Diagnostic, Finding, Location, Severity};
use crate::document::Document;
use crate::fixer::suggest_fix;
use crate::program::{ProgramError, ProgramTable};
use crate::verifier::Verifier;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Rule id reported for tree documents that cannot be loaded
pub const LOAD_ERROR: &str = "load-error";

/// Error setting up the engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid layout program: {0}")]
    Program(#[from] ProgramError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result of a verification run
#[derive(Debug, Default)]
pub struct LintResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,

    /// Files processed
    pub files_processed: usize,

    /// Files with errors
    pub files_with_errors: usize,

    /// Files with warnings
    pub files_with_warnings: usize,

    /// Total errors
    pub error_count: usize,

    /// Total warnings
    pub warning_count: usize,

    /// Total info messages
    pub info_count: usize,

    /// Processing duration
    pub duration: Duration,
}

impl LintResult {
    /// Result for one file's diagnostics
    pub fn for_file(diagnostics: Vec<Diagnostic>) -> Self {
        let mut result = LintResult {
            files_processed: 1,
            ..LintResult::default()
        };
        for diag in &diagnostics {
            match diag.severity {
                Severity::Error => result.error_count += 1,
                Severity::Warning => result.warning_count += 1,
                Severity::Info => result.info_count += 1,
            }
        }
        if result.error_count > 0 {
            result.files_with_errors = 1;
        }
        if result.warning_count > 0 {
            result.files_with_warnings = 1;
        }
        result.diagnostics = diagnostics;
        result
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    /// Check if result is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }

    /// Get exit code (0 = success, 1 = warnings, 2 = errors)
    pub fn exit_code(&self) -> i32 {
        if self.error_count > 0 {
            2
        } else if self.warning_count > 0 {
            1
        } else {
            0
        }
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: LintResult) {
        self.diagnostics.extend(other.diagnostics);
        self.files_processed += other.files_processed;
        self.files_with_errors += other.files_with_errors;
        self.files_with_warnings += other.files_with_warnings;
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
        self.info_count += other.info_count;
    }
}

/// The verification engine: one program table, many files
pub struct Engine {
    config: Config,

    table: ProgramTable,

    /// Number of context lines to include
    context_lines: usize,
}

impl Engine {
    /// Build the program table for `config`; malformed programs fail here
    pub fn new(config: Config) -> Result<Self, EngineError> {
        config.layout.validate()?;
        let table = ProgramTable::from_settings(&config.layout)?;
        Ok(Self {
            config,
            table,
            context_lines: 0,
        })
    }

    /// Set the number of context lines to include
    pub fn with_context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn table(&self) -> &ProgramTable {
        &self.table
    }

    /// Verify tree documents; each tree runs start to finish on one thread
    pub fn lint(&self, files: &[PathBuf]) -> LintResult {
        let start = Instant::now();

        let results: Vec<LintResult> = if self.config.engine.parallel {
            let jobs = if self.config.engine.jobs > 0 {
                self.config.engine.jobs
            } else {
                num_cpus::get()
            };
            match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => pool.install(|| files.par_iter().map(|f| self.lint_file(f)).collect()),
                Err(e) => {
                    log::warn!("thread pool unavailable ({}), verifying sequentially", e);
                    files.iter().map(|f| self.lint_file(f)).collect()
                }
            }
        } else {
            files.iter().map(|f| self.lint_file(f)).collect()
        };

        let mut combined = LintResult::default();
        for result in results {
            combined.merge(result);
        }

        combined.duration = start.elapsed();
        combined
    }

    /// Load and verify one tree document
    pub fn lint_file(&self, path: &Path) -> LintResult {
        log::debug!("verifying {}", path.display());
        match Document::load(path, self.config.layout.tab_width) {
            Ok(document) => LintResult::for_file(self.verify_document(&document)),
            Err(e) => {
                let diag = Diagnostic::new(
                    LOAD_ERROR,
                    Severity::Error,
                    &e.to_string(),
                    Location::new(path.to_path_buf(), 0, 0),
                );
                LintResult::for_file(vec![diag])
            }
        }
    }

    /// Verify a loaded document and turn its findings into diagnostics
    pub fn verify_document(&self, document: &Document) -> Vec<Diagnostic> {
        let verifier = Verifier::new(&self.table, &self.config.layout);
        let findings = verifier.findings(&document.tree, &document.source);
        let file = document.display_path();
        let tab_width = document.source.tab_width();
        let expanded: Vec<String> = document
            .source
            .lines()
            .iter()
            .map(|l| expand_tabs(l, tab_width))
            .collect();
        let lines: Vec<&str> = expanded.iter().map(String::as_str).collect();

        let mut diagnostics: Vec<Diagnostic> = findings
            .iter()
            .filter(|f| self.config.is_rule_enabled(f.rule_id()))
            .filter(|f| !self.config.should_ignore_rule_for_file(f.rule_id(), file))
            .map(|f| self.to_diagnostic(f, document, &lines))
            .collect();
        diagnostics.sort_by_key(|d| (d.location.line, d.location.column));
        log::debug!(
            "{}: {} finding(s), {} reported",
            file.display(),
            findings.len(),
            diagnostics.len()
        );
        diagnostics
    }

    /// `lines` are the source lines with tabs expanded, so carets line up
    fn to_diagnostic(&self, finding: &Finding, document: &Document, lines: &[&str]) -> Diagnostic {
        let rule_id = finding.rule_id();
        let severity = self
            .config
            .get_severity_override(rule_id)
            .unwrap_or_else(|| finding.message.default_severity());
        let location = Location::new(
            document.display_path().to_path_buf(),
            finding.line,
            finding.column,
        )
        .with_length(finding.length);

        let mut diag = Diagnostic::new(rule_id, severity, &finding.message.to_string(), location);
        if finding.line > 0 && finding.line <= lines.len() {
            diag = diag.with_source_line(lines[finding.line - 1]);
            if self.context_lines > 0 {
                diag = diag.with_context(lines, self.context_lines);
            }
        }
        if let Some(help) = help_for(rule_id) {
            diag = diag.with_help(help);
        }
        // Inline sources have no file to edit
        if document.source_path.is_some() {
            if let Some(fix) = suggest_fix(finding, &document.source) {
                diag = diag.with_fix(fix);
            }
        }
        diag
    }
}

fn help_for(rule_id: &str) -> Option<&'static str> {
    match rule_id {
        "must-wrap" => Some("start a new line before this token"),
        "same-line" => Some("join this token onto the previous line"),
        "column" => Some("align the token with the column shown"),
        "unexpected-token" | "extra-token" | "missing-token" => {
            Some("the syntax tree does not have the shape this construct requires")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    const CALL_TREE: &str = r#"
source: Call.java
root:
  kind: expr_statement
  children:
    - kind: call_expr
      children:
        - { kind: identifier, text: f, line: 1, column: 0 }
        - kind: arguments
          children:
            - { kind: l_paren, text: "(", line: 1, column: 1 }
            - { kind: identifier, text: a, line: 1, column: 2 }
            - { kind: comma, text: ",", line: 1, column: 3 }
            - { kind: identifier, text: b, line: 2, column: 2 }
            - { kind: r_paren, text: ")", line: 2, column: 3 }
    - { kind: semi, text: ";", line: 2, column: 4 }
"#;

    fn write_call(dir: &Path) -> PathBuf {
        fs::write(dir.join("Call.java"), "f(a,\n  b);\n").unwrap();
        let path = dir.join("Call.tree.yaml");
        fs::write(&path, CALL_TREE).unwrap();
        path
    }

    #[test]
    fn test_lint_result_exit_code() {
        let mut result = LintResult::default();
        assert_eq!(result.exit_code(), 0);

        result.warning_count = 1;
        assert_eq!(result.exit_code(), 1);

        result.error_count = 1;
        assert_eq!(result.exit_code(), 2);
    }

    #[test]
    fn test_lint_result_merge() {
        let mut a = LintResult {
            files_processed: 1,
            error_count: 2,
            ..Default::default()
        };
        let b = LintResult {
            files_processed: 2,
            warning_count: 3,
            files_with_warnings: 1,
            ..Default::default()
        };
        a.merge(b);
        assert_eq!(a.files_processed, 3);
        assert_eq!(a.error_count, 2);
        assert_eq!(a.warning_count, 3);
        assert!(!a.is_clean());
    }

    #[test]
    fn test_lint_file_reports_column() {
        let dir = tempdir().unwrap();
        let path = write_call(dir.path());
        let engine = Engine::new(Config::default()).unwrap();

        let result = engine.lint_file(&path);
        assert_eq!(result.warning_count, 1);
        assert_eq!(result.exit_code(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.rule_id, "column");
        assert_eq!(diag.message, "`b` must appear in column 5, not 3");
        assert_eq!(diag.location.file, dir.path().join("Call.java"));
        assert_eq!((diag.location.line, diag.location.column), (2, 3));
        assert_eq!(diag.source_line.as_deref(), Some("  b);"));
        assert!(diag.fix.as_ref().is_some_and(|f| f.is_safe()));
    }

    #[test]
    fn test_rule_settings_apply() {
        let dir = tempdir().unwrap();
        let path = write_call(dir.path());

        let mut config = Config::default();
        config.rules.severity.insert("column".to_string(), Severity::Error);
        let result = Engine::new(config).unwrap().lint_file(&path);
        assert_eq!(result.error_count, 1);

        let mut config = Config::default();
        config.rules.disabled.push("column".to_string());
        let result = Engine::new(config).unwrap().lint_file(&path);
        assert!(result.is_clean());

        let mut config = Config::default();
        config
            .rules
            .per_file
            .insert("**/Call.java".to_string(), vec!["all".to_string()]);
        let result = Engine::new(config).unwrap().lint_file(&path);
        assert!(result.is_clean());
    }

    #[test]
    fn test_load_errors_do_not_stop_the_run() {
        let dir = tempdir().unwrap();
        let good = write_call(dir.path());
        let bad = dir.path().join("Bad.tree.json");
        fs::write(&bad, "{ not json").unwrap();

        let mut config = Config::default();
        config.engine.parallel = true;
        config.engine.jobs = 2;
        let result = Engine::new(config).unwrap().lint(&[bad.clone(), good]);
        assert_eq!(result.files_processed, 2);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.warning_count, 1);
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.rule_id == LOAD_ERROR && d.location.file == bad));
    }

    #[test]
    fn test_invalid_layout_fails_fast() {
        let mut config = Config::default();
        config.layout.basic_offset = 0;
        assert!(matches!(Engine::new(config), Err(EngineError::Config(_))));
    }
}
