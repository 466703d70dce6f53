//! Wrapcheck CLI - verifies the layout of serialized syntax trees

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use glob::glob;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use wrapcheck::config::{ColorMode, Config, OutputFormat};
use wrapcheck::diagnostic::Message;
use wrapcheck::engine::{Engine, LOAD_ERROR};
use wrapcheck::fixer::Fixer;
use wrapcheck::output::{
    CompactFormatter, GithubFormatter, JsonFormatter, OutputFormatter, TextFormatter,
};

/// Exit code for configuration, program and usage errors
const EXIT_SETUP_ERROR: i32 = 3;

#[derive(Parser)]
#[command(
    name = "wrapcheck",
    version,
    about = "Syntax-tree line-wrap and indentation verifier",
    long_about = "Verifies that parsed syntax trees (*.tree.json, *.tree.yaml) are wrapped, \
                  indented and aligned according to configurable layout policies."
)]
struct Cli {
    /// Tree documents or glob patterns (default: files.include under the current directory)
    files: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Columns a tab advances to
    #[arg(long)]
    tab_width: Option<usize>,

    /// Indentation added per nesting level
    #[arg(long)]
    offset: Option<usize>,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Only enable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<String>>,

    /// Show source context lines around findings
    #[arg(long, default_value = "0")]
    context: usize,

    /// Show statistics
    #[arg(long)]
    stats: bool,

    /// Auto-fix layout findings (dry-run by default, use with --write to apply)
    #[arg(long)]
    fix: bool,

    /// Write fixes to files (requires --fix)
    #[arg(long, requires = "fix")]
    write: bool,

    /// Show diff of changes instead of applying fixes
    #[arg(long)]
    diff: bool,

    /// Include unsafe fixes (line breaks and joins)
    #[arg(long)]
    unsafe_fixes: bool,

    /// Print every construct program for the current configuration and exit
    #[arg(long)]
    list_programs: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Github,
    Compact,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Github => OutputFormat::Github,
            Format::Compact => OutputFormat::Compact,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "wrapcheck=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            EXIT_SETUP_ERROR
        }
    };
    std::process::exit(exit_code);
}

/// Warn about rule ids that no finding is ever reported under
fn check_rule_ids(flag: &str, ids: Option<&Vec<String>>) {
    for id in ids.into_iter().flatten() {
        if id != LOAD_ERROR && !Message::rule_ids().contains(&id.as_str()) {
            log::warn!("{}: unknown rule '{}' (known: {})", flag, id, Message::rule_ids().join(", "));
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    check_rule_ids("--disable", cli.disable.as_ref());
    check_rule_ids("--select", cli.select.as_ref());

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load_default().context("failed to load default config")?,
    };

    config
        .merge_cli(
            cli.format.map(OutputFormat::from),
            Some(cli.verbose),
            cli.tab_width,
            cli.offset,
            cli.disable.clone(),
            cli.select.clone(),
        )
        .context("invalid command line settings")?;

    match config.output.color {
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Always if !cli.no_color => colored::control::set_override(true),
        _ => {}
    }
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = load_config(&cli)?;
    let engine = Engine::new(config)?.with_context_lines(cli.context);

    if cli.list_programs {
        for program in engine.table().iter() {
            println!("{}\n", program);
        }
        return Ok(0);
    }

    let files = if cli.files.is_empty() {
        discover_files(Path::new("."), engine.config())?
    } else {
        expand_patterns(&cli.files)?
    };

    if files.is_empty() {
        bail!("no tree documents found");
    }
    if cli.verbose {
        eprintln!("Verifying {} files...", files.len());
    }

    let result = engine.lint(&files);

    if cli.fix || cli.diff {
        let mut fixer = Fixer::new(!cli.write).with_unsafe_fixes(cli.unsafe_fixes);
        if cli.diff {
            fixer = fixer.with_diff_mode();
        }
        fixer.collect_from_diagnostics(&result.diagnostics);
        report_fixes(&fixer, &cli);
    }

    let formatter: Box<dyn OutputFormatter> = match engine.config().output.format {
        OutputFormat::Text => {
            let mut f = TextFormatter::new();
            if cli.no_color || engine.config().output.color == ColorMode::Never {
                f = f.without_color();
            }
            f.show_stats = cli.stats || engine.config().output.statistics;
            f.show_context = cli.context > 0;
            Box::new(f)
        }
        OutputFormat::Json => Box::new(JsonFormatter::new().pretty()),
        OutputFormat::Github => Box::new(GithubFormatter::new()),
        OutputFormat::Compact => Box::new(CompactFormatter::new()),
    };
    print!("{}", formatter.format(&result));

    Ok(result.exit_code())
}

fn report_fixes(fixer: &Fixer, cli: &Cli) {
    if fixer.pending_count() == 0 {
        if cli.verbose {
            eprintln!("No auto-fixes available");
        }
        return;
    }

    let fix_result = fixer.apply_all();
    if cli.diff {
        print!("{}", fixer.format_diffs(&fix_result));
    } else if fixer.is_dry_run() {
        eprintln!(
            "Would apply {} of {} fixes ({} safe, {} unsafe)",
            fix_result.fixes_applied,
            fixer.pending_count(),
            fix_result.safe_fixes_applied,
            fix_result.unsafe_fixes_applied
        );
        eprintln!("Use --write to apply fixes");
    } else {
        eprintln!(
            "Applied {} fixes to {} files ({} safe, {} unsafe)",
            fix_result.fixes_applied,
            fix_result.files_modified,
            fix_result.safe_fixes_applied,
            fix_result.unsafe_fixes_applied
        );
    }

    if fix_result.fixes_skipped > 0 {
        eprintln!(
            "{}: {} unsafe fixes skipped (use --unsafe-fixes to include)",
            "note".blue(),
            fix_result.fixes_skipped
        );
    }
    if fix_result.fixes_overlapping > 0 {
        eprintln!(
            "{}: {} overlapping fixes left for another run",
            "note".blue(),
            fix_result.fixes_overlapping
        );
    }
    for error in &fix_result.errors {
        eprintln!("{}: {}", "warning".yellow(), error);
    }
}

/// Expand the command-line patterns; plain paths pass through as they are
fn expand_patterns(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let paths = glob(pattern).with_context(|| format!("invalid pattern '{}'", pattern))?;
        let before = files.len();
        files.extend(paths.flatten().filter(|p| p.is_file()));
        if files.len() == before {
            // Let the engine report unreadable files as load errors
            files.push(PathBuf::from(pattern));
        }
    }
    Ok(files)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("invalid glob '{}'", pattern))?);
    }
    Ok(builder.build()?)
}

/// Every file under `root` matching `files.include` and not `files.exclude`
fn discover_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let exclude = build_globset(&config.files.exclude)?;
    let mut files = Vec::new();
    for pattern in &config.files.include {
        let full = root.join(pattern);
        let full = full.to_string_lossy();
        let paths = glob(&full).with_context(|| format!("invalid include pattern '{}'", pattern))?;
        for path in paths.flatten() {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            if path.is_file() && !exclude.is_match(relative) && !exclude.is_match(&path) {
                files.push(path);
            }
        }
    }
    files.sort();
    files.dedup();
    log::debug!("discovered {} tree documents", files.len());
    Ok(files)
}
