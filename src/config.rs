//! Configuration system for the layout verifier
//!
//! Reads configuration from:
//! - `.wrapcheck.yaml` / `.wrapcheck.json` (project-level)
//! - `~/.wrapcheck.yaml` (user-level)
//! - built-in presets (`default`, `strict`, `relaxed`)

use crate::diagnostic::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Verify files on a thread pool (each tree is still verified on one thread)
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Verbose output
    pub verbose: bool,

    /// Show statistics
    pub statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: ColorMode::Auto,
            verbose: false,
            statistics: true,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Github,
    Compact,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "github" => Ok(OutputFormat::Github),
            "compact" => Ok(OutputFormat::Compact),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// File handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Include patterns
    pub include: Vec<String>,

    /// Exclude patterns
    pub exclude: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            include: vec![
                "**/*.tree.json".to_string(),
                "**/*.tree.yaml".to_string(),
                "**/*.tree.yml".to_string(),
            ],
            exclude: vec!["**/target/**".to_string(), "**/node_modules/**".to_string()],
        }
    }
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Enabled rules (empty = all)
    pub enabled: Vec<String>,

    /// Severity overrides (rule_id -> severity)
    pub severity: HashMap<String, Severity>,

    /// Per-file rule ignores (glob pattern -> rule IDs)
    pub per_file: HashMap<String, Vec<String>>,
}

/// Where a line break may go between two elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapPolicy {
    /// The second element must start a new line
    #[serde(alias = "must-wrap", alias = "must_wrap")]
    Must,
    /// Either on the same line or wrapped to the expected column
    #[serde(alias = "may-wrap", alias = "may_wrap")]
    May,
    /// Both elements must share a line
    #[serde(alias = "no-wrap", alias = "no_wrap")]
    No,
}

impl std::str::FromStr for WrapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "must" | "must-wrap" => Ok(WrapPolicy::Must),
            "may" | "may-wrap" => Ok(WrapPolicy::May),
            "no" | "no-wrap" => Ok(WrapPolicy::No),
            _ => Err(format!("Unknown wrap policy: {}", s)),
        }
    }
}

impl std::fmt::Display for WrapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WrapPolicy::Must => write!(f, "must"),
            WrapPolicy::May => write!(f, "may"),
            WrapPolicy::No => write!(f, "no"),
        }
    }
}

/// Wrap policy per construct boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapSettings {
    /// Between the last annotation and what follows it
    pub after_annotations: WrapPolicy,
    /// Between consecutive annotations
    pub annotations: WrapPolicy,
    pub extends: WrapPolicy,
    pub implements: WrapPolicy,
    pub throws: WrapPolicy,
    /// Before the opening brace of a body
    pub left_brace: WrapPolicy,
    /// Before `else`
    #[serde(rename = "else")]
    pub else_: WrapPolicy,
    pub catch: WrapPolicy,
    pub finally: WrapPolicy,
    /// Before the `while` of a do statement
    pub do_while: WrapPolicy,
    /// After `=` in declarations
    pub assignment: WrapPolicy,
    pub parameters: WrapPolicy,
    pub arguments: WrapPolicy,
    pub before_operator: WrapPolicy,
    pub after_operator: WrapPolicy,
    pub ternary: WrapPolicy,
    /// Before `.` in a selector chain
    pub selector: WrapPolicy,
    /// Before a statement body that is not a block
    pub statement_body: WrapPolicy,
    /// Before `)` and `}` closing a list
    pub closing_paren: WrapPolicy,
}

impl Default for WrapSettings {
    fn default() -> Self {
        Self {
            after_annotations: WrapPolicy::May,
            annotations: WrapPolicy::May,
            extends: WrapPolicy::May,
            implements: WrapPolicy::May,
            throws: WrapPolicy::May,
            left_brace: WrapPolicy::No,
            else_: WrapPolicy::May,
            catch: WrapPolicy::May,
            finally: WrapPolicy::May,
            do_while: WrapPolicy::May,
            assignment: WrapPolicy::May,
            parameters: WrapPolicy::May,
            arguments: WrapPolicy::May,
            before_operator: WrapPolicy::May,
            after_operator: WrapPolicy::No,
            ternary: WrapPolicy::May,
            selector: WrapPolicy::May,
            statement_body: WrapPolicy::May,
            closing_paren: WrapPolicy::May,
        }
    }
}

/// Which bodies may sit on a single line (`{ return x; }`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneLineSettings {
    pub blocks: bool,
    pub class_bodies: bool,
    pub switch_bodies: bool,
}

impl Default for OneLineSettings {
    fn default() -> Self {
        Self {
            blocks: true,
            class_bodies: false,
            switch_bodies: false,
        }
    }
}

/// Which runs may place several elements on one line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplePerLineSettings {
    pub statements: bool,
    pub members: bool,
    pub parameters: bool,
    pub arguments: bool,
    pub array_elements: bool,
    pub type_lists: bool,
    pub case_groups: bool,
}

impl Default for MultiplePerLineSettings {
    fn default() -> Self {
        Self {
            statements: false,
            members: false,
            parameters: true,
            arguments: true,
            array_elements: true,
            type_lists: true,
            case_groups: false,
        }
    }
}

/// Layout policy values that parameterize the construct programs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Columns per tab stop
    pub tab_width: usize,

    /// Columns one indentation level adds
    pub basic_offset: usize,

    pub wrap: WrapSettings,

    pub allow_one_line: OneLineSettings,

    pub multiple_per_line: MultiplePerLineSettings,

    /// Align `=` of consecutive declarations on adjacent lines
    pub align_declarations: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            tab_width: 4,
            basic_offset: 4,
            wrap: WrapSettings::default(),
            allow_one_line: OneLineSettings::default(),
            multiple_per_line: MultiplePerLineSettings::default(),
            align_declarations: false,
        }
    }
}

impl LayoutSettings {
    /// Check values that serde cannot reject on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_width == 0 {
            return Err(ConfigError::Invalid(
                "layout.tab_width must be positive".to_string(),
            ));
        }
        if self.basic_offset == 0 {
            return Err(ConfigError::Invalid(
                "layout.basic_offset must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extend from other configuration files or presets
    #[serde(default)]
    pub extends: Vec<String>,

    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// File handling settings
    pub files: FilesConfig,

    /// Rule configuration
    pub rules: RulesConfig,

    /// Layout policy
    pub layout: LayoutSettings,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a preset configuration by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "strict" => Some(Self::preset_strict()),
            "relaxed" => Some(Self::preset_relaxed()),
            _ => None,
        }
    }

    /// Strict preset - one element per line, annotations on their own line
    fn preset_strict() -> Self {
        let mut config = Self::default();
        let layout = &mut config.layout;
        layout.wrap.after_annotations = WrapPolicy::Must;
        layout.wrap.annotations = WrapPolicy::Must;
        layout.wrap.statement_body = WrapPolicy::Must;
        layout.allow_one_line = OneLineSettings {
            blocks: false,
            class_bodies: false,
            switch_bodies: false,
        };
        layout.multiple_per_line = MultiplePerLineSettings {
            statements: false,
            members: false,
            parameters: false,
            arguments: false,
            array_elements: false,
            type_lists: false,
            case_groups: false,
        };
        layout.align_declarations = true;
        config
    }

    /// Relaxed preset - one-line bodies and shared lines allowed
    fn preset_relaxed() -> Self {
        let mut config = Self::default();
        let layout = &mut config.layout;
        layout.wrap.left_brace = WrapPolicy::May;
        layout.wrap.after_operator = WrapPolicy::May;
        layout.allow_one_line = OneLineSettings {
            blocks: true,
            class_bodies: true,
            switch_bodies: true,
        };
        layout.multiple_per_line = MultiplePerLineSettings {
            statements: true,
            members: true,
            parameters: true,
            arguments: true,
            array_elements: true,
            type_lists: true,
            case_groups: true,
        };
        config
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_with_depth(path, 0)?;
        config.layout.validate()?;
        Ok(config)
    }

    /// Load with recursion depth limit (to prevent infinite loops)
    fn load_with_depth(path: &Path, depth: usize) -> Result<Self, ConfigError> {
        const MAX_DEPTH: usize = 10;
        if depth >= MAX_DEPTH {
            return Err(ConfigError::Invalid(
                "Maximum config inheritance depth exceeded".to_string(),
            ));
        }

        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        // Keep the raw document so that `extends` only overrides the layout
        // keys this file actually sets.
        let (mut config, raw_layout): (Self, Option<serde_json::Value>) = match ext {
            "yaml" | "yml" => {
                let value: serde_yaml::Value = serde_yaml::from_str(&content)?;
                let layout = value
                    .get("layout")
                    .map(serde_json::to_value)
                    .transpose()?;
                (serde_yaml::from_value(value)?, layout)
            }
            "json" => {
                let value: serde_json::Value = serde_json::from_str(&content)?;
                let layout = value.get("layout").cloned();
                (serde_json::from_value(value)?, layout)
            }
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        // Process extends
        if !config.extends.is_empty() {
            let base_dir = path.parent().unwrap_or(Path::new("."));
            let mut base_config = Self::default();

            for extend in &config.extends.clone() {
                let extended = if let Some(preset) = Self::preset(extend) {
                    preset
                } else {
                    let extend_path = if Path::new(extend).is_absolute() {
                        PathBuf::from(extend)
                    } else {
                        base_dir.join(extend)
                    };
                    Self::load_with_depth(&extend_path, depth + 1)?
                };
                base_config.merge(extended);
            }

            let layout = match raw_layout {
                Some(overrides) => overlay_layout(&base_config.layout, overrides)?,
                None => base_config.layout.clone(),
            };
            base_config.merge(config);
            base_config.layout = layout;
            config = base_config;
        }

        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Self) {
        // Extends are not inherited

        if other.engine.jobs != 0 {
            self.engine.jobs = other.engine.jobs;
        }
        self.engine.parallel = other.engine.parallel;

        // Output settings
        if other.output.format != OutputFormat::Text {
            self.output.format = other.output.format;
        }
        if other.output.verbose {
            self.output.verbose = true;
        }
        if other.output.color != ColorMode::Auto {
            self.output.color = other.output.color;
        }

        // Files - extend lists
        for pattern in other.files.include {
            if !self.files.include.contains(&pattern) {
                self.files.include.push(pattern);
            }
        }
        for pattern in other.files.exclude {
            if !self.files.exclude.contains(&pattern) {
                self.files.exclude.push(pattern);
            }
        }

        // Rules - merge
        self.rules.disabled.extend(other.rules.disabled);
        if !other.rules.enabled.is_empty() {
            self.rules.enabled = other.rules.enabled;
        }
        self.rules.severity.extend(other.rules.severity);
        for (pattern, rules) in other.rules.per_file {
            self.rules.per_file.entry(pattern).or_default().extend(rules);
        }

        // Layout is a complete policy; the later one wins
        self.layout = other.layout;
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [
            ".wrapcheck.yaml",
            ".wrapcheck.yml",
            ".wrapcheck.json",
            "wrapcheck.yaml",
            "wrapcheck.json",
        ];

        // Check current directory
        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        // Check home directory
        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        format: Option<OutputFormat>,
        verbose: Option<bool>,
        tab_width: Option<usize>,
        basic_offset: Option<usize>,
        disabled_rules: Option<Vec<String>>,
        enabled_rules: Option<Vec<String>>,
    ) -> Result<(), ConfigError> {
        if let Some(f) = format {
            self.output.format = f;
        }
        if let Some(v) = verbose {
            self.output.verbose = v;
        }
        if let Some(width) = tab_width {
            self.layout.tab_width = width;
        }
        if let Some(offset) = basic_offset {
            self.layout.basic_offset = offset;
        }
        if let Some(disabled) = disabled_rules {
            self.rules.disabled.extend(disabled);
        }
        if let Some(enabled) = enabled_rules {
            self.rules.enabled = enabled;
        }
        self.layout.validate()
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        if self.rules.disabled.iter().any(|r| r == rule_id) {
            return false;
        }

        if !self.rules.enabled.is_empty() {
            return self.rules.enabled.iter().any(|r| r == rule_id);
        }

        true
    }

    /// Get severity override for a rule
    pub fn get_severity_override(&self, rule_id: &str) -> Option<Severity> {
        self.rules.severity.get(rule_id).copied()
    }

    /// Check if a rule should be ignored for a file
    pub fn should_ignore_rule_for_file(&self, rule_id: &str, file_path: &Path) -> bool {
        let file_str = file_path.to_string_lossy();

        for (pattern, rules) in &self.rules.per_file {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(file_str.as_ref())
                    && rules.iter().any(|r| r == "all" || r == rule_id)
                {
                    return true;
                }
            }
        }

        false
    }
}

/// Apply the keys of a partial `layout` document on top of `base`
fn overlay_layout(
    base: &LayoutSettings,
    overrides: serde_json::Value,
) -> Result<LayoutSettings, ConfigError> {
    let mut merged = serde_json::to_value(base)?;
    merge_json(&mut merged, overrides);
    Ok(serde_json::from_value(merged)?)
}

fn merge_json(base: &mut serde_json::Value, overrides: serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert!(!config.engine.parallel);
        assert_eq!(config.engine.jobs, 0);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.layout.tab_width, 4);
        assert_eq!(config.layout.basic_offset, 4);
        assert!(config
            .files
            .include
            .contains(&"**/*.tree.json".to_string()));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("GitHub".parse::<OutputFormat>().unwrap(), OutputFormat::Github);
        assert!("sarif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_wrap_policy_aliases() {
        let yaml = r#"
wrap:
  catch: must-wrap
  finally: no_wrap
  else: may
"#;
        let layout: LayoutSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(layout.wrap.catch, WrapPolicy::Must);
        assert_eq!(layout.wrap.finally, WrapPolicy::No);
        assert_eq!(layout.wrap.else_, WrapPolicy::May);
        assert_eq!(layout.wrap.left_brace, WrapPolicy::No);
        assert_eq!("may-wrap".parse::<WrapPolicy>(), Ok(WrapPolicy::May));
        assert_eq!("NO_WRAP".parse::<WrapPolicy>(), Ok(WrapPolicy::No));
    }

    #[test]
    fn test_config_merge_cli() {
        let mut config = Config::new();
        config
            .merge_cli(
                Some(OutputFormat::Json),
                Some(true),
                Some(8),
                Some(2),
                Some(vec!["column".to_string()]),
                None,
            )
            .unwrap();

        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.verbose);
        assert_eq!(config.layout.tab_width, 8);
        assert_eq!(config.layout.basic_offset, 2);
        assert!(config.rules.disabled.contains(&"column".to_string()));
    }

    #[test]
    fn test_zero_offset_rejected() {
        let mut config = Config::new();
        let err = config
            .merge_cli(None, None, None, Some(0), None, None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rule_enabled() {
        let mut config = Config::new();
        assert!(config.is_rule_enabled("must-wrap"));

        config.rules.disabled.push("same-line".to_string());
        assert!(!config.is_rule_enabled("same-line"));
        assert!(config.is_rule_enabled("column"));

        config.rules.enabled = vec!["column".to_string()];
        assert!(!config.is_rule_enabled("must-wrap"));
        assert!(config.is_rule_enabled("column"));
    }

    #[test]
    fn test_severity_override() {
        let mut config = Config::new();
        config.rules.severity.insert("column".to_string(), Severity::Error);

        assert_eq!(config.get_severity_override("column"), Some(Severity::Error));
        assert_eq!(config.get_severity_override("must-wrap"), None);
    }

    #[test]
    fn test_per_file_ignore() {
        let mut config = Config::new();
        config
            .rules
            .per_file
            .insert("**/generated/**".to_string(), vec!["all".to_string()]);
        assert!(config.should_ignore_rule_for_file("column", Path::new("src/generated/a.tree.json")));
        assert!(!config.should_ignore_rule_for_file("column", Path::new("src/a.tree.json")));
    }

    #[test]
    fn test_yaml_deserialize() {
        let yaml = r#"
engine:
  parallel: true
  jobs: 4
output:
  format: json
layout:
  tab_width: 8
  multiple_per_line:
    statements: true
rules:
  disabled:
    - same-line
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.engine.parallel);
        assert_eq!(config.engine.jobs, 4);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.layout.tab_width, 8);
        assert!(config.layout.multiple_per_line.statements);
        assert!(config.layout.multiple_per_line.arguments);
        assert_eq!(config.rules.disabled, vec!["same-line".to_string()]);
    }

    #[test]
    fn test_presets() {
        let strict = Config::preset("strict").unwrap();
        assert_eq!(strict.layout.wrap.annotations, WrapPolicy::Must);
        assert!(!strict.layout.allow_one_line.blocks);
        assert!(strict.layout.align_declarations);

        let relaxed = Config::preset("relaxed").unwrap();
        assert!(relaxed.layout.multiple_per_line.statements);
        assert!(Config::preset("unknown").is_none());
    }

    #[test]
    fn test_extends_preset_keeps_unset_layout_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".wrapcheck.yaml");
        std::fs::write(
            &path,
            "extends: [strict]\nlayout:\n  basic_offset: 2\n  wrap:\n    catch: no\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.layout.basic_offset, 2);
        assert_eq!(config.layout.wrap.catch, WrapPolicy::No);
        // inherited from the preset
        assert_eq!(config.layout.wrap.annotations, WrapPolicy::Must);
        assert!(config.layout.align_declarations);
    }

    #[test]
    fn test_extends_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("base.json"),
            r#"{"layout": {"tab_width": 2}, "rules": {"disabled": ["column"]}}"#,
        )
        .unwrap();
        let path = dir.path().join("wrapcheck.yaml");
        std::fs::write(&path, "extends: [base.json]\nrules:\n  disabled: [same-line]\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.layout.tab_width, 2);
        assert!(!config.is_rule_enabled("column"));
        assert!(!config.is_rule_enabled("same-line"));
    }

    #[test]
    fn test_extends_cycle_is_bounded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loop.yaml");
        std::fs::write(&path, "extends: [loop.yaml]\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_layout_in_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "layout:\n  tab_width: 0\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }
}
