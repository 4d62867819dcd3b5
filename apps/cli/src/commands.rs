//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use rulebook_core::pipeline::{
    self, CompileConfig, ProgressReporter, ValidateConfig,
};
use rulebook_shared::{AppConfig, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Rulebook — turn rule files into one canonical reference document.
#[derive(Parser)]
#[command(
    name = "rulebook",
    version,
    about = "Compile metadata-tagged rule files into a single reference document.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Compile all rule files into the output document.
    Compile {
        /// Directory containing the rule files.
        #[arg(long)]
        rules_dir: Option<String>,

        /// Manifest file for the document header.
        #[arg(long)]
        manifest: Option<String>,

        /// Output file (fully overwritten).
        #[arg(short, long)]
        out: Option<String>,

        /// Config file (defaults to ./rulebook.toml).
        #[arg(long)]
        config: Option<String>,
    },

    /// Validate every rule file against the required schema.
    Validate {
        /// Directory containing the rule files.
        #[arg(long)]
        rules_dir: Option<String>,

        /// Config file (defaults to ./rulebook.toml).
        #[arg(long)]
        config: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "rulebook=info",
        1 => "rulebook=debug",
        _ => "rulebook=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Compile {
            rules_dir,
            manifest,
            out,
            config,
        } => cmd_compile(
            rules_dir.as_deref(),
            manifest.as_deref(),
            out.as_deref(),
            config.as_deref(),
        ),
        Command::Validate { rules_dir, config } => {
            cmd_validate(rules_dir.as_deref(), config.as_deref())
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Load config from an explicit path or the working directory default.
fn resolve_config(config: Option<&str>) -> Result<AppConfig> {
    let config = match config {
        Some(path) => load_config_from(Path::new(path))?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_compile(
    rules_dir: Option<&str>,
    manifest: Option<&str>,
    out: Option<&str>,
    config: Option<&str>,
) -> Result<()> {
    let app_config = resolve_config(config)?;

    // CLI flags win over config file values.
    let compile_config = CompileConfig {
        rules_dir: PathBuf::from(rules_dir.unwrap_or(&app_config.paths.rules_dir)),
        manifest_path: PathBuf::from(manifest.unwrap_or(&app_config.paths.manifest)),
        output_path: PathBuf::from(out.unwrap_or(&app_config.paths.output)),
    };

    info!(
        rules_dir = %compile_config.rules_dir.display(),
        output = %compile_config.output_path.display(),
        "compiling rules"
    );

    let reporter = CliProgress::new();
    let result = pipeline::compile(&compile_config, &reporter)?;

    println!();
    println!("  Document compiled successfully!");
    println!("  Output:   {}", result.output_path.display());
    println!("  Sections: {}", result.section_count);
    println!("  Rules:    {}", result.rule_count);
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_validate(rules_dir: Option<&str>, config: Option<&str>) -> Result<()> {
    let app_config = resolve_config(config)?;

    let validate_config = ValidateConfig {
        rules_dir: PathBuf::from(rules_dir.unwrap_or(&app_config.paths.rules_dir)),
    };

    info!(rules_dir = %validate_config.rules_dir.display(), "validating rules");

    let report = pipeline::validate(&validate_config)?;

    for failure in &report.failures {
        eprintln!("✗ {}:", failure.id);
        for violation in &failure.violations {
            eprintln!("  - {violation}");
        }
    }

    println!("\n{} rules validated successfully", report.validated_count);

    if report.has_failures() {
        eprintln!("{} errors found", report.violation_count);
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn rule_loaded(&self, id: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Loading [{current}/{total}] {id}"));
    }

    fn done(&self) {
        self.spinner.finish_and_clear();
    }
}
