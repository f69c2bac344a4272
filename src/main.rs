// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use obsidian2anki::app_config::{Config, LogLevel};
use obsidian2anki::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export tagged notes to an Anki CSV file (default command)
    Export(ExportArgs),

    /// Generate shell completions for obsidian2anki
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct ExportArgs {
    /// Root directory of the Obsidian vault
    #[arg(long = "vault", value_name = "DIR", env = "OBSIDIAN_VAULT")]
    vault_path: Option<PathBuf>,

    /// Directory the CSV file is written to
    #[arg(short = 'o', long, value_name = "DIR", env = "EXPORT_DIR")]
    export_dir: Option<PathBuf>,

    /// Tag selecting the notes to export
    #[arg(short, long, env = "ANKI_TAG")]
    tag: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of an existing export file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

/// obsidian2anki - Export Obsidian tables as Anki cards
#[derive(Parser, Debug)]
#[command(name = "obsidian2anki")]
#[command(version)]
#[command(about = "Export tables from tagged Obsidian notes to an Anki CSV file")]
#[command(long_about = "obsidian2anki scans an Obsidian vault for notes tagged for export, reads the
tables in those notes and writes them as Anki cards to a CSV file.

EXAMPLES:
    obsidian2anki --vault ~/vault -o ~/anki          # Export with the default tag
    obsidian2anki -t '#cards/spanish'                # Use another tag (vault from env)
    obsidian2anki --log-level debug                  # Show per-table details
    obsidian2anki completions bash > o2a.bash        # Generate bash completions

CONFIGURATION:
    Settings are read from conf.json when present, then from the environment
    (OBSIDIAN_VAULT, EXPORT_DIR, ANKI_TAG, also loaded from a .env file), then
    from the command line.

TABLES:
    Columns are mapped by position: Text, Context, Translation, Notes and an
    optional fifth Omit column. Rows with anything in Omit are skipped.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    export: ExportArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level.min(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger is installed at the most verbose level; the effective
    // level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Values from .env become visible to the env-backed arguments
    dotenvy::dotenv().ok();

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "obsidian2anki", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Export(args)) => run_export(args),
        None => run_export(cli.export),
    }
}

fn run_export(options: ExportArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;

    if options.write_config {
        config.save(&options.config_path)?;
        info!("Configuration written to {}", options.config_path);
        return Ok(());
    }

    config.validate().context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    let summary = controller.run()?;

    if summary.output.is_none() {
        info!("No export file written");
    }

    Ok(())
}

// @loads: Config file, then environment and CLI overrides
fn load_config(options: &ExportArgs) -> Result<Config> {
    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        if options.config_path != "conf.json" {
            warn!("Config file not found at '{}', using defaults.", options.config_path);
        }
        Config::default()
    };

    if let Some(vault_path) = &options.vault_path {
        config.vault_path = vault_path.clone();
    }

    if let Some(export_dir) = &options.export_dir {
        config.export_dir = export_dir.clone();
    }

    if let Some(tag) = &options.tag {
        config.export_tag = tag.clone();
    }

    if options.force_overwrite {
        config.force_overwrite = true;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
