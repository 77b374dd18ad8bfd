// Logalizer - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

use super::constants;

/// Top-level error type for all Logalizer operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogalizerError {
    /// Rule configuration loading or validation failed.
    RuleConfig(RuleConfigError),

    /// Application settings could not be loaded.
    Config(ConfigError),

    /// Writing the translation, backup, or trimmed log failed.
    Output(OutputError),

    /// A configured command or the diagram renderer failed.
    Execute(ExecuteError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl LogalizerError {
    /// Process exit status for this error.
    ///
    /// A failing external command propagates its own exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RuleConfig(RuleConfigError::Io { .. }) => constants::EXIT_IO,
            Self::RuleConfig(_) => constants::EXIT_CONFIG,
            Self::Io { .. } => constants::EXIT_IO,
            Self::Execute(ExecuteError::Failed {
                code: Some(code), ..
            }) => *code,
            _ => constants::EXIT_FAILURE,
        }
    }
}

impl fmt::Display for LogalizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuleConfig(e) => write!(f, "Rule configuration error: {e}"),
            Self::Config(e) => write!(f, "Settings error: {e}"),
            Self::Output(e) => write!(f, "Output error: {e}"),
            Self::Execute(e) => write!(f, "Execution error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LogalizerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RuleConfig(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Output(e) => Some(e),
            Self::Execute(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule configuration errors
// ---------------------------------------------------------------------------

/// Errors related to loading and validating the rule configuration.
///
/// `location` names the offending entry, e.g. `translations[3]`,
/// `pairs[0]`, or `rules.csv row 4`.
#[derive(Debug)]
pub enum RuleConfigError {
    /// JSON file could not be parsed.
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// CSV rule table could not be parsed.
    CsvParse { path: PathBuf, source: csv::Error },

    /// Configuration file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A required field is missing or empty.
    MissingField {
        location: String,
        field: &'static str,
    },

    /// The `duplicates` tag is not a known strategy.
    UnknownDuplicateStrategy { location: String, value: String },

    /// A `delete_lines` regular expression is invalid.
    InvalidRegex {
        location: String,
        pattern: String,
        source: regex::Error,
    },

    /// A `delete_lines` regular expression exceeds the maximum allowed length.
    RegexTooLong {
        location: String,
        length: usize,
        max_length: usize,
    },

    /// I/O error reading a configuration file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for RuleConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonParse { path, source } => {
                write!(f, "Failed to parse JSON '{}': {source}", path.display())
            }
            Self::CsvParse { path, source } => {
                write!(f, "Failed to parse CSV '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Configuration '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::MissingField { location, field } => {
                write!(f, "{location}: missing required field '{field}'")
            }
            Self::UnknownDuplicateStrategy { location, value } => write!(
                f,
                "{location}: unknown duplicates strategy '{value}'. Expected one of: \
                 none, allowed, remove_all, remove, remove_continuous, count, count_continuous"
            ),
            Self::InvalidRegex {
                location,
                pattern,
                source,
            } => write!(f, "{location}: invalid regex '{pattern}': {source}"),
            Self::RegexTooLong {
                location,
                length,
                max_length,
            } => write!(
                f,
                "{location}: regex is {length} chars, exceeds maximum of {max_length}"
            ),
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading configuration '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for RuleConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::JsonParse { source, .. } => Some(source),
            Self::CsvParse { source, .. } => Some(source),
            Self::InvalidRegex { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RuleConfigError> for LogalizerError {
    fn from(e: RuleConfigError) -> Self {
        Self::RuleConfig(e)
    }
}

// ---------------------------------------------------------------------------
// Settings errors
// ---------------------------------------------------------------------------

/// Errors related to loading `settings.toml`.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Settings file exceeds the maximum allowed size.
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    /// I/O error reading the settings file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Settings parse error '{}': {source}", path.display())
            }
            Self::FileTooLarge { path, size, max } => write!(
                f,
                "Settings '{}' is {size} bytes, exceeds maximum of {max} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "Settings I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogalizerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Output errors
// ---------------------------------------------------------------------------

/// Errors related to writing files.
#[derive(Debug)]
pub enum OutputError {
    /// Creating an output directory failed.
    CreateDir { path: PathBuf, source: io::Error },

    /// Writing an output file failed.
    Write { path: PathBuf, source: io::Error },

    /// Copying the original log to its backup location failed.
    Backup {
        original: PathBuf,
        backup: PathBuf,
        source: io::Error,
    },

    /// Replacing the original log with its trimmed copy failed.
    Rewrite { path: PathBuf, source: io::Error },
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(f, "Cannot create directory '{}': {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "Cannot write '{}': {source}", path.display())
            }
            Self::Backup {
                original,
                backup,
                source,
            } => write!(
                f,
                "Cannot back up '{}' to '{}': {source}",
                original.display(),
                backup.display()
            ),
            Self::Rewrite { path, source } => {
                write!(f, "Cannot rewrite '{}' in place: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. }
            | Self::Write { source, .. }
            | Self::Backup { source, .. }
            | Self::Rewrite { source, .. } => Some(source),
        }
    }
}

impl From<OutputError> for LogalizerError {
    fn from(e: OutputError) -> Self {
        Self::Output(e)
    }
}

// ---------------------------------------------------------------------------
// Execute errors
// ---------------------------------------------------------------------------

/// Errors related to running configured commands and the diagram renderer.
#[derive(Debug)]
pub enum ExecuteError {
    /// The command could not be started at all.
    Spawn { command: String, source: io::Error },

    /// The command ran and exited unsuccessfully.
    /// `code` is `None` when the process was terminated by a signal.
    Failed { command: String, code: Option<i32> },
}

impl fmt::Display for ExecuteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { command, source } => {
                write!(f, "Cannot start '{command}': {source}")
            }
            Self::Failed {
                command,
                code: Some(code),
            } => write!(f, "'{command}' failed with exit code {code}"),
            Self::Failed { command, code: None } => {
                write!(f, "'{command}' was terminated by a signal")
            }
        }
    }
}

impl std::error::Error for ExecuteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::Failed { .. } => None,
        }
    }
}

impl From<ExecuteError> for LogalizerError {
    fn from(e: ExecuteError) -> Self {
        Self::Execute(e)
    }
}

/// Convenience type alias for Logalizer results.
pub type Result<T> = std::result::Result<T, LogalizerError>;
