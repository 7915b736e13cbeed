//! gherlint CLI
//!
//! Linter for Cucumber Gherkin feature files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use tracing::error;
use tracing_subscriber::EnvFilter;

use gherlint_core::{
    CheckerRegistry, CollectingReporter, GherkinLinter, LanguageFixer, LinterConfig, TextReporter,
    compute_statistics,
};

/// gherlint is a linter for Cucumber Gherkin feature files.
#[derive(Parser)]
#[command(name = "gherlint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Perform linting of feature files
    Lint {
        /// Feature file or directory to lint
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Compute metrics over your feature files
    Stats {
        /// Feature file or directory to analyze
        path: PathBuf,
    },

    /// Add or fix language tags in feature files
    ///
    /// If gherlint detects that a language other than English is used, it
    /// will infer the correct language and add the corresponding tag. A
    /// tag that does not fit the file contents is replaced.
    FixLanguageTags {
        /// Feature file or directory to fix
        path: PathBuf,

        /// Don't write to disk, only report which files would change
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(found_problems) => {
            if found_problems {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Lint { path, format } => run_lint(&cli, path, *format),
        Commands::Stats { path } => run_stats(path).map(|_| false),
        Commands::FixLanguageTags { path, dry_run } => {
            run_fix_language_tags(path, *dry_run).map(|_| false)
        }
    }
}

fn load_config(cli: &Cli) -> Result<LinterConfig> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    LinterConfig::load(cli.config.as_deref(), &cwd).into_diagnostic()
}

fn run_lint(cli: &Cli, path: &std::path::Path, format: OutputFormat) -> Result<bool> {
    let config = load_config(cli)?;
    let registry = CheckerRegistry::with_builtin_checkers();
    match format {
        OutputFormat::Text => {
            let mut reporter = TextReporter::stdout();
            let mut linter =
                GherkinLinter::new(&config, &registry, &mut reporter).into_diagnostic()?;
            let count = linter.run(path).into_diagnostic()?;
            Ok(count > 0)
        }
        OutputFormat::Json => {
            let mut reporter = CollectingReporter::new();
            let mut linter =
                GherkinLinter::new(&config, &registry, &mut reporter).into_diagnostic()?;
            let count = linter.run(path).into_diagnostic()?;
            let rendered =
                serde_json::to_string_pretty(&reporter.diagnostics).into_diagnostic()?;
            println!("{rendered}");
            Ok(count > 0)
        }
    }
}

fn run_stats(path: &std::path::Path) -> Result<()> {
    let statistics = compute_statistics(path).into_diagnostic()?;
    print!("{}", statistics.summary());
    Ok(())
}

fn run_fix_language_tags(path: &std::path::Path, dry_run: bool) -> Result<()> {
    let changed = LanguageFixer::new(path)
        .run(!dry_run)
        .into_diagnostic()?;
    for file in changed {
        println!("{}", file.display());
    }
    Ok(())
}
