// Logalizer - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. settings.toml loading
// 3. Logging initialisation (debug mode support)
// 4. Running the translation job and mapping failures to exit codes

use clap::Parser;
use logalizer::app::job::{self, JobOptions};
use logalizer::core::config::{sample_config, GroupSelection};
use logalizer::platform::config::{load_settings, PlatformPaths};
use logalizer::util;
use std::path::PathBuf;
use std::process::ExitCode;

/// Logalizer - translate trace logs into sequence-diagram text.
///
/// Rules in a JSON configuration pick interesting lines out of a log and
/// rewrite them as interactions; the result can be rendered with PlantUML.
#[derive(Parser, Debug)]
#[command(name = "logalizer", version, about)]
struct Cli {
    /// Log file to translate.
    #[arg(short = 'f', long = "file", required_unless_present = "config_help")]
    file: Option<PathBuf>,

    /// Rule configuration (default: settings [translation] config_file, else config.json).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// PlantUML jar; renders the translation to PNG after `execute`.
    #[arg(short = 'p', long = "plantuml")]
    plantuml: Option<PathBuf>,

    /// Comma-separated groups to enable (all others are disabled).
    #[arg(short = 'e', long = "enable")]
    enable: Option<String>,

    /// Comma-separated groups to disable.
    #[arg(short = 'd', long = "disable")]
    disable: Option<String>,

    /// Settings file (default: platform config directory).
    #[arg(long = "settings")]
    settings: Option<PathBuf>,

    /// Do not run `execute` commands or the PlantUML step.
    #[arg(long = "no-execute")]
    no_execute: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(long = "debug")]
    debug: bool,

    /// Print an annotated sample rule configuration and exit.
    #[arg(long = "config-help")]
    config_help: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.config_help {
        print!("{}", sample_config());
        return ExitCode::SUCCESS;
    }

    let mut warnings = Vec::new();
    let (settings_path, required) = match cli.settings {
        Some(ref path) => (path.clone(), true),
        None => {
            let (paths, path_warnings) = PlatformPaths::resolve();
            warnings.extend(path_warnings);
            (paths.settings_file, false)
        }
    };

    let settings = match load_settings(&settings_path, required) {
        Ok((settings, settings_warnings)) => {
            warnings.extend(settings_warnings);
            settings
        }
        Err(e) => {
            util::logging::init(cli.debug, None, None);
            for warning in &warnings {
                tracing::warn!("{}", warning);
            }
            let err = util::error::LogalizerError::from(e);
            tracing::error!(error = %err, "Cannot load settings");
            eprintln!("Error: {err}");
            return exit_code(err.exit_code());
        }
    };

    // Initialise logging subsystem
    util::logging::init(
        cli.debug,
        settings.log_level.as_deref(),
        settings.log_file.as_deref(),
    );

    for warning in &warnings {
        tracing::warn!(settings = %settings_path.display(), "{}", warning);
    }
    tracing::debug!(settings = %settings_path.display(), "Settings file resolved");

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "Logalizer starting"
    );

    let Some(log_file) = cli.file else {
        // clap enforces -f unless --config-help was given.
        eprintln!("Error: no log file given (-f <log>)");
        return exit_code(util::constants::EXIT_FAILURE);
    };

    let options = JobOptions {
        log_file,
        config_file: cli.config.unwrap_or(settings.config_file),
        groups: GroupSelection::from_lists(cli.enable.as_deref(), cli.disable.as_deref()),
        plantuml_jar: cli.plantuml.or(settings.plantuml_jar),
        java: settings.java,
        no_execute: cli.no_execute,
    };

    match job::run(&options) {
        Ok(summary) => {
            tracing::info!(
                output = %summary.translation_file.display(),
                lines = summary.written,
                read = summary.stats.lines_read,
                deleted = summary.deleted,
                commands = summary.commands_run,
                "Done"
            );
            println!("{}", summary.translation_file.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Translation failed");
            eprintln!("Error: {e}");
            exit_code(e.exit_code())
        }
    }
}

/// Convert a process status to an `ExitCode`, keeping non-zero codes
/// non-zero after truncation to a byte.
fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(0) | Err(_) => ExitCode::FAILURE,
        Ok(c) => ExitCode::from(c),
    }
}
