//! Findings from the verifier and the diagnostics reported for them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What went wrong, with the parameters of its message template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Message {
    /// A line break is required before `next`
    MustWrap { next: String },
    /// `prev` and `next` must share a line
    SameLine { prev: String, next: String },
    /// `token` sits at the wrong expanded column (both 1-based)
    Column {
        token: String,
        expected: usize,
        actual: usize,
    },
    /// A child of the wrong kind
    UnexpectedToken { expected: String, actual: String },
    /// Children left over after the program finished
    ExtraToken { token: String },
    /// Children ran out before the program finished
    MissingToken { prev: String },
}

impl Message {
    /// Rule id the message is reported under
    pub fn rule_id(&self) -> &'static str {
        match self {
            Message::MustWrap { .. } => "must-wrap",
            Message::SameLine { .. } => "same-line",
            Message::Column { .. } => "column",
            Message::UnexpectedToken { .. } => "unexpected-token",
            Message::ExtraToken { .. } => "extra-token",
            Message::MissingToken { .. } => "missing-token",
        }
    }

    /// Structural messages mean the tree does not have the expected shape;
    /// the rest are layout problems in a well-formed tree.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Message::UnexpectedToken { .. } | Message::ExtraToken { .. } | Message::MissingToken { .. }
        )
    }

    /// Severity used when the configuration does not override it
    pub fn default_severity(&self) -> Severity {
        if self.is_structural() {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    /// All rule ids, for `--disable`/`--select` validation and listings
    pub fn rule_ids() -> &'static [&'static str] {
        &[
            "must-wrap",
            "same-line",
            "column",
            "unexpected-token",
            "extra-token",
            "missing-token",
        ]
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::MustWrap { next } => write!(f, "must wrap line before `{}`", next),
            Message::SameLine { prev, next } => {
                write!(f, "`{}` must appear on same line as `{}`", prev, next)
            }
            Message::Column {
                token,
                expected,
                actual,
            } => write!(
                f,
                "`{}` must appear in column {}, not {}",
                token, expected, actual
            ),
            Message::UnexpectedToken { expected, actual } => {
                write!(f, "expected `{}` instead of `{}`", expected, actual)
            }
            Message::ExtraToken { token } => write!(f, "unexpected extra token `{}`", token),
            Message::MissingToken { prev } => write!(f, "token missing after `{}`", prev),
        }
    }
}

/// One verifier report, anchored on a token.
///
/// Findings carry no severity; the engine decides that when turning them
/// into [`Diagnostic`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// 1-based line of the anchor token
    pub line: usize,
    /// 1-based expanded column of the anchor token
    pub column: usize,
    /// 0-based raw column of the anchor token
    pub raw_column: usize,
    /// Length of the anchor token text
    pub length: usize,
    pub message: Message,
    /// Indentation the anchor should get when it starts a line
    pub indent: Option<usize>,
}

impl Finding {
    pub fn rule_id(&self) -> &'static str {
        self.message.rule_id()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Severity level for diagnostics
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,
    /// Layout problem
    #[default]
    Warning,
    /// Structural problem or unreadable input
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" | "hint" | "note" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// Fix safety classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixSafety {
    /// Only whitespace inside one line changes
    #[default]
    Safe,
    /// Line structure changes; later tokens may need another pass
    Unsafe,
}

impl fmt::Display for FixSafety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixSafety::Safe => write!(f, "safe"),
            FixSafety::Unsafe => write!(f, "unsafe"),
        }
    }
}

/// Source code location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, tabs expanded)
    pub column: usize,
    /// Length of the highlighted region
    pub length: usize,
}

impl Location {
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            length: 0,
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }
}

/// A whitespace edit that resolves a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Description of the fix
    pub description: String,
    /// The replacement text
    pub replacement: String,
    /// Start byte offset in the source file
    pub start_offset: usize,
    /// End byte offset in the source file (exclusive)
    pub end_offset: usize,
    /// Safety classification of this fix
    #[serde(default)]
    pub safety: FixSafety,
}

impl Fix {
    pub fn safe(description: &str, replacement: &str, start: usize, end: usize) -> Self {
        Self {
            description: description.to_string(),
            replacement: replacement.to_string(),
            start_offset: start,
            end_offset: end,
            safety: FixSafety::Safe,
        }
    }

    pub fn unsafe_fix(description: &str, replacement: &str, start: usize, end: usize) -> Self {
        Self {
            safety: FixSafety::Unsafe,
            ..Self::safe(description, replacement, start, end)
        }
    }

    pub fn is_safe(&self) -> bool {
        self.safety == FixSafety::Safe
    }

    /// Whether two edits touch overlapping byte ranges
    pub fn overlaps(&self, other: &Fix) -> bool {
        self.start_offset < other.end_offset.max(other.start_offset + 1)
            && other.start_offset < self.end_offset.max(self.start_offset + 1)
    }
}

/// A reported diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule ID that triggered this diagnostic
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Source location
    pub location: Location,
    /// The source line (for display)
    pub source_line: Option<String>,
    /// Context lines before the error line
    #[serde(default)]
    pub context_before: Vec<(usize, String)>,
    /// Context lines after the error line
    #[serde(default)]
    pub context_after: Vec<(usize, String)>,
    /// Help text
    pub help: Option<String>,
    /// Suggested fix
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub fn new(rule_id: &str, severity: Severity, message: &str, location: Location) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            message: message.to_string(),
            location,
            source_line: None,
            context_before: Vec::new(),
            context_after: Vec::new(),
            help: None,
            fix: None,
        }
    }

    /// Add source line for display
    pub fn with_source_line(mut self, line: &str) -> Self {
        self.source_line = Some(line.to_string());
        self
    }

    /// Add context lines from source content
    pub fn with_context(mut self, source_lines: &[&str], context_count: usize) -> Self {
        if context_count == 0 || self.location.line == 0 {
            return self;
        }

        let line_num = self.location.line;

        let start = line_num.saturating_sub(context_count + 1);
        let end = line_num.saturating_sub(1);
        for (i, line) in source_lines
            .iter()
            .enumerate()
            .skip(start)
            .take(end.saturating_sub(start))
        {
            self.context_before.push((i + 1, line.to_string()));
        }

        let end = (line_num + context_count).min(source_lines.len());
        for (i, line) in source_lines
            .iter()
            .enumerate()
            .skip(line_num)
            .take(end.saturating_sub(line_num))
        {
            self.context_after.push((i + 1, line.to_string()));
        }

        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}
