//! Whitespace fixes for layout findings
//!
//! Every fix is a single byte-range edit that only touches whitespace:
//! - `column`: reindent a token that starts its line, or widen/narrow the
//!   gap before a token inside a line
//! - `must-wrap`: break the line before the token
//! - `same-line`: join the token onto the previous line
//!
//! Reindenting is safe. Breaking and joining lines are unsafe: a join can
//! pull code behind a line comment, a break can split a construct the
//! front end treats as one line.

use crate::column::{indent_string, SourceText};
use crate::diagnostic::{Diagnostic, Finding, Fix, FixSafety, Message};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Propose an edit for a finding; structural findings get none
pub fn suggest_fix(finding: &Finding, source: &SourceText) -> Option<Fix> {
    let start_of_token = source.offset(finding.line, finding.raw_column)?;
    let line_start = source.line_start(finding.line)?;
    let before = &source.text()[line_start..start_of_token];
    let starts_line = before.chars().all(|c| c == ' ' || c == '\t');

    match &finding.message {
        Message::Column { expected, actual, .. } => {
            if starts_line {
                let indent = finding.indent.unwrap_or(expected - 1);
                return Some(Fix::safe(
                    &format!("reindent to column {}", indent + 1),
                    &indent_string(indent),
                    line_start,
                    start_of_token,
                ));
            }
            // Mid-line: resize the gap before the token
            let trimmed = before.trim_end_matches([' ', '\t']);
            if trimmed.len() == before.len() {
                return None;
            }
            let gap_column = source.column_of(finding.line, trimmed.chars().count());
            let gap_width = (finding.column - 1).saturating_sub(gap_column);
            let width = (gap_width + expected).checked_sub(*actual).filter(|w| *w > 0)?;
            Some(Fix::safe(
                &format!("move to column {}", expected),
                &" ".repeat(width),
                line_start + trimmed.len(),
                start_of_token,
            ))
        }
        Message::MustWrap { .. } => {
            let indent = finding.indent?;
            let gap = before.len() - before.trim_end_matches([' ', '\t']).len();
            Some(Fix::unsafe_fix(
                "wrap line",
                &format!("\n{}", indent_string(indent)),
                start_of_token - gap,
                start_of_token,
            ))
        }
        Message::SameLine { .. } => {
            let text = source.text();
            let preceding = text[..start_of_token].trim_end_matches([' ', '\t', '\r', '\n']);
            if preceding.len() == start_of_token {
                return None;
            }
            let last = preceding.chars().last();
            let first = text[start_of_token..].chars().next();
            let tight = matches!(first, Some('(' | ')' | ';' | ',' | '.' | '[' | ']'))
                || matches!(last, Some('(' | '[' | '.'));
            Some(Fix::unsafe_fix(
                "join lines",
                if tight { "" } else { " " },
                preceding.len(),
                start_of_token,
            ))
        }
        _ => None,
    }
}

/// A fix waiting to be applied to one file
#[derive(Debug, Clone)]
pub struct PendingFix {
    pub file: PathBuf,
    pub line: usize,
    pub rule_id: String,
    pub fix: Fix,
}

/// Result of applying fixes
#[derive(Debug, Default)]
pub struct FixResult {
    /// Number of files modified
    pub files_modified: usize,
    /// Number of fixes applied
    pub fixes_applied: usize,
    pub safe_fixes_applied: usize,
    pub unsafe_fixes_applied: usize,
    /// Fixes dropped because an earlier one touched the same bytes
    pub fixes_overlapping: usize,
    /// Number of fixes that failed
    pub fixes_failed: usize,
    /// Number of fixes skipped (unsafe when not allowed)
    pub fixes_skipped: usize,
    /// Errors encountered
    pub errors: Vec<String>,
    /// Diff output (if diff mode enabled)
    pub diffs: HashMap<PathBuf, String>,
}

/// Fix mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixMode {
    /// Apply only safe fixes (default)
    #[default]
    SafeOnly,
    /// Apply all fixes including unsafe
    All,
    /// Diff mode - show changes without applying
    Diff,
}

/// Applies collected fixes to source files
pub struct Fixer {
    /// Dry run mode (don't write changes)
    dry_run: bool,
    fixes_by_file: HashMap<PathBuf, Vec<PendingFix>>,
    mode: FixMode,
    include_unsafe: bool,
}

impl Fixer {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            fixes_by_file: HashMap::new(),
            mode: FixMode::SafeOnly,
            include_unsafe: false,
        }
    }

    pub fn with_mode(mut self, mode: FixMode) -> Self {
        self.mode = mode;
        self
    }

    /// Include unsafe fixes
    pub fn with_unsafe_fixes(mut self, include: bool) -> Self {
        self.include_unsafe = include;
        if include && self.mode == FixMode::SafeOnly {
            self.mode = FixMode::All;
        }
        self
    }

    pub fn with_diff_mode(mut self) -> Self {
        self.mode = FixMode::Diff;
        self
    }

    /// Collect fixes from diagnostics
    pub fn collect_from_diagnostics(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            if let Some(fix) = &diag.fix {
                self.add_fix(PendingFix {
                    file: diag.location.file.clone(),
                    line: diag.location.line,
                    rule_id: diag.rule_id.clone(),
                    fix: fix.clone(),
                });
            }
        }
    }

    pub fn add_fix(&mut self, fix: PendingFix) {
        self.fixes_by_file
            .entry(fix.file.clone())
            .or_default()
            .push(fix);
    }

    fn should_apply_fix(&self, fix: &PendingFix) -> bool {
        match self.mode {
            FixMode::All => true,
            FixMode::SafeOnly => fix.fix.safety == FixSafety::Safe,
            FixMode::Diff => self.include_unsafe || fix.fix.safety == FixSafety::Safe,
        }
    }

    /// Apply all collected fixes
    pub fn apply_all(&self) -> FixResult {
        let mut result = FixResult::default();

        let mut files: Vec<&PathBuf> = self.fixes_by_file.keys().collect();
        files.sort();
        for file in files {
            let fixes = &self.fixes_by_file[file];
            let applicable: Vec<&PendingFix> =
                fixes.iter().filter(|f| self.should_apply_fix(f)).collect();
            result.fixes_skipped += fixes.len() - applicable.len();

            match self.apply_fixes_to_file(file, &applicable, &mut result) {
                Ok(count) => {
                    if count > 0 {
                        result.files_modified += 1;
                        result.fixes_applied += count;
                    }
                }
                Err(e) => {
                    result.fixes_failed += applicable.len();
                    result.errors.push(format!("{}: {}", file.display(), e));
                }
            }
        }

        result
    }

    /// Apply edits bottom-up so earlier offsets stay valid
    fn apply_fixes_to_file(
        &self,
        file: &Path,
        fixes: &[&PendingFix],
        result: &mut FixResult,
    ) -> Result<usize, std::io::Error> {
        if fixes.is_empty() {
            return Ok(0);
        }

        let content = std::fs::read_to_string(file)?;
        let mut sorted: Vec<&PendingFix> = fixes.to_vec();
        sorted.sort_by(|a, b| b.fix.start_offset.cmp(&a.fix.start_offset));

        let mut modified = content.clone();
        let mut applied: Vec<&Fix> = Vec::new();
        for pending in sorted {
            let fix = &pending.fix;
            if fix.end_offset > content.len()
                || fix.start_offset > fix.end_offset
                || !content.is_char_boundary(fix.start_offset)
                || !content.is_char_boundary(fix.end_offset)
            {
                result.fixes_failed += 1;
                continue;
            }
            if applied.iter().any(|done| done.overlaps(fix)) {
                log::debug!(
                    "{}:{}: skipping overlapping {} fix",
                    file.display(),
                    pending.line,
                    pending.rule_id
                );
                result.fixes_overlapping += 1;
                continue;
            }
            modified.replace_range(fix.start_offset..fix.end_offset, &fix.replacement);
            if fix.is_safe() {
                result.safe_fixes_applied += 1;
            } else {
                result.unsafe_fixes_applied += 1;
            }
            applied.push(fix);
        }

        if !applied.is_empty() {
            if self.mode == FixMode::Diff {
                let diff = generate_unified_diff(file, &content, &modified);
                result.diffs.insert(file.to_path_buf(), diff);
            } else if !self.dry_run {
                std::fs::write(file, &modified)?;
            }
        }

        Ok(applied.len())
    }

    /// Get count of fixes pending
    pub fn pending_count(&self) -> usize {
        self.fixes_by_file.values().map(|v| v.len()).sum()
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn mode(&self) -> FixMode {
        self.mode
    }

    /// Format diff output for display
    pub fn format_diffs(&self, result: &FixResult) -> String {
        let mut files: Vec<&PathBuf> = result.diffs.keys().collect();
        files.sort();
        let mut output = String::new();
        for file in files {
            output.push_str(&format!(
                "diff --wrapcheck a/{} b/{}\n",
                file.display(),
                file.display()
            ));
            output.push_str(&result.diffs[file]);
            output.push('\n');
        }
        output
    }
}

/// Line diff between two versions of a file, one hunk per changed region
fn generate_unified_diff(file: &Path, original: &str, modified: &str) -> String {
    let mut diff = String::new();
    let original_lines: Vec<&str> = original.lines().collect();
    let modified_lines: Vec<&str> = modified.lines().collect();

    diff.push_str(&format!("--- a/{}\n", file.display()));
    diff.push_str(&format!("+++ b/{}\n", file.display()));

    // Fixes only add or remove line breaks, so a common prefix and suffix
    // frame the changed region
    let prefix = original_lines
        .iter()
        .zip(&modified_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = original_lines[prefix..]
        .iter()
        .rev()
        .zip(modified_lines[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let removed = &original_lines[prefix..original_lines.len() - suffix];
    let added = &modified_lines[prefix..modified_lines.len() - suffix];
    if removed.is_empty() && added.is_empty() {
        return diff;
    }

    let context_start = prefix.saturating_sub(1);
    let context_end = (original_lines.len() - suffix + 1).min(original_lines.len());
    let trailing = context_end - (original_lines.len() - suffix);
    diff.push_str(&format!(
        "@@ -{},{} +{},{} @@\n",
        context_start + 1,
        context_end - context_start,
        context_start + 1,
        (prefix - context_start) + added.len() + trailing
    ));
    for line in &original_lines[context_start..prefix] {
        diff.push_str(&format!(" {}\n", line));
    }
    for line in removed {
        diff.push_str(&format!("-{}\n", line));
    }
    for line in added {
        diff.push_str(&format!("+{}\n", line));
    }
    for line in &original_lines[original_lines.len() - suffix..context_end] {
        diff.push_str(&format!(" {}\n", line));
    }
    diff
}
