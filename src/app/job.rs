// Logalizer - app/job.rs
//
// One translation job: rule configuration + one log file in, translation
// file (and optionally a backup, trimmed log and rendered diagram) out.
//
// Steps, in order:
//   1. load and validate the rule configuration (JSON, optional CSV table)
//   2. select rules by group
//   3. expand path variables against the log path
//   4. back up the log (if configured)
//   5. read the log, drop `delete_lines` matches
//   6. rewrite the log in place (only when a backup exists to fall back on)
//   7. translate and write the wrapped document
//   8. run `execute` commands, then the PlantUML step

use crate::core::config::{self, GroupSelection, TranslationConfig};
use crate::core::output::Document;
use crate::core::path_vars::PathVariables;
use crate::core::render::apply_replacements;
use crate::core::translate::{remove_deleted_lines, translate_lines, TranslationStats};
use crate::platform::{exec, fs};
use crate::util::constants;
use crate::util::error::{LogalizerError, OutputError, Result, RuleConfigError};
use std::path::{Path, PathBuf};

/// Inputs of one job, resolved from the CLI and settings.
#[derive(Debug, Clone)]
pub struct JobOptions {
    pub log_file: PathBuf,
    pub config_file: PathBuf,
    pub groups: GroupSelection,
    /// Render the translation with this PlantUML jar after `execute`.
    pub plantuml_jar: Option<PathBuf>,
    pub java: String,
    /// Skip `execute` commands and the PlantUML step.
    pub no_execute: bool,
}

impl JobOptions {
    pub fn new(log_file: impl Into<PathBuf>, config_file: impl Into<PathBuf>) -> Self {
        Self {
            log_file: log_file.into(),
            config_file: config_file.into(),
            groups: GroupSelection::default(),
            plantuml_jar: None,
            java: constants::DEFAULT_JAVA.to_string(),
            no_execute: false,
        }
    }
}

/// What a finished job produced.
#[derive(Debug, Clone)]
pub struct JobSummary {
    pub translation_file: PathBuf,
    /// Set when a backup was configured (whether or not this run made it).
    pub backup_file: Option<PathBuf>,
    pub stats: TranslationStats,
    /// Lines removed by `delete_lines`.
    pub deleted: usize,
    /// Lines written, wrap text included.
    pub written: usize,
    pub commands_run: usize,
    pub diagram_rendered: bool,
}

/// Read a rule configuration file, enforcing the size limit.
fn read_rule_file(path: &Path) -> std::result::Result<String, RuleConfigError> {
    let io_err = |e: std::io::Error| RuleConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > constants::MAX_RULE_CONFIG_FILE_SIZE {
        return Err(RuleConfigError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: constants::MAX_RULE_CONFIG_FILE_SIZE,
        });
    }

    fs::read_file_lossy(path).map_err(io_err)
}

/// Load, parse and validate the rule configuration at `path`.
///
/// A `translations_csv` entry is resolved relative to the directory of
/// `path`.
pub fn load_rule_config(path: &Path) -> std::result::Result<TranslationConfig, RuleConfigError> {
    let content = read_rule_file(path)?;
    let def = config::parse_config_json(&content, path)?;

    let csv_rules = match def.translations_csv.as_deref().filter(|c| !c.is_empty()) {
        Some(csv_name) => {
            let csv_path = path
                .parent()
                .map(|dir| dir.join(csv_name))
                .unwrap_or_else(|| PathBuf::from(csv_name));
            tracing::debug!(file = %csv_path.display(), "Loading CSV rule table");
            let csv_content = read_rule_file(&csv_path)?;
            Some(config::parse_rules_csv(&csv_content, &csv_path)?)
        }
        None => None,
    };

    let compiled = config::validate_and_compile(def, csv_rules)?;
    tracing::info!(
        file = %path.display(),
        rules = compiled.rules.len(),
        pairs = compiled.pairs.len(),
        "Rule configuration loaded"
    );
    Ok(compiled)
}

/// Run one translation job.
pub fn run(options: &JobOptions) -> Result<JobSummary> {
    let config = load_rule_config(&options.config_file)?;
    let rule_set = config.rule_set(&options.groups)?;

    let vars = PathVariables::from_log_path(&options.log_file);
    let translation_file = PathBuf::from(vars.expand(&config.translation_file));
    let backup_file = config
        .backup_file
        .as_deref()
        .map(|b| PathBuf::from(vars.expand(b)));

    if let Some(ref backup) = backup_file {
        fs::backup_if_absent(&options.log_file, backup)?;
    }

    let raw = fs::read_lines_lossy(&options.log_file).map_err(|e| LogalizerError::Io {
        path: options.log_file.clone(),
        operation: "read log",
        source: e,
    })?;
    let (lines, deleted) = remove_deleted_lines(raw, &config.deletions);
    tracing::info!(
        file = %options.log_file.display(),
        lines = lines.len(),
        deleted,
        "Log loaded"
    );

    // Only rewrite when the untouched original is preserved elsewhere.
    if backup_file.is_some() {
        let trimmed: Vec<String> = lines
            .iter()
            .map(|line| apply_replacements(line, rule_set.replacements()))
            .collect();
        fs::rewrite_in_place(&options.log_file, &trimmed)?;
    }

    let result = translate_lines(&lines, &rule_set);
    let stats = result.stats;

    let document = Document::assemble(
        &config.wrap_text_pre,
        result.lines,
        &config.wrap_text_post,
        config.auto_new_line,
    );
    write_document(&translation_file, &document)?;
    tracing::info!(
        file = %translation_file.display(),
        lines = document.len(),
        unmatched = stats.unmatched,
        pair_errors = stats.pair_errors,
        "Translation written"
    );

    let mut summary = JobSummary {
        translation_file,
        backup_file,
        stats,
        deleted,
        written: document.len(),
        commands_run: 0,
        diagram_rendered: false,
    };

    if options.no_execute {
        tracing::debug!("Command execution disabled");
        return Ok(summary);
    }

    let commands: Vec<String> = config.execute.iter().map(|c| vars.expand(c)).collect();
    summary.commands_run = exec::run_all(&commands)?;

    if let Some(ref jar) = options.plantuml_jar {
        exec::render_plantuml(
            &options.java,
            jar,
            &summary.translation_file,
            document.len(),
        )?;
        summary.diagram_rendered = true;
    }

    Ok(summary)
}

fn write_document(path: &Path, document: &Document) -> std::result::Result<(), OutputError> {
    let mut writer = fs::create_output_file(path)?;
    document
        .write_to(&mut writer)
        .map_err(|e| OutputError::Write {
            path: path.to_path_buf(),
            source: e,
        })
}
