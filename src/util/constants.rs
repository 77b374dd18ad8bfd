// Logalizer - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Logalizer";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "Logalizer";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Rule configuration
// =============================================================================

/// Rule configuration file used when neither the CLI nor settings name one.
pub const DEFAULT_RULE_CONFIG_FILE: &str = "config.json";

/// Maximum size of a rule configuration file (JSON or CSV) in bytes.
pub const MAX_RULE_CONFIG_FILE_SIZE: u64 = 8 * 1024 * 1024; // 8 MB

/// Maximum regex pattern length in `delete_lines` to prevent ReDoS.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4_096;

/// Characters that turn a `delete_lines` entry into a regular expression.
/// Entries without any of these are matched as plain substrings.
pub const REGEX_META_CHARS: &[char] = &['[', '\\', '^', '$', '.', '|', '?', '*', '+'];

/// Maximum number of pattern / variable columns in a CSV rule table.
pub const CSV_MAX_PATTERNS: usize = 3;

/// `enable` column values in a CSV rule table that disable the row.
pub const CSV_DISABLED_VALUES: &[&str] = &["no", "false", "0"];

// =============================================================================
// Template tokens
// =============================================================================

/// Placeholder checked to decide between positional and packed rendering.
pub const FIRST_PLACEHOLDER: &str = "${1}";

/// Placeholder replaced with the occurrence tally of counted lines.
pub const COUNT_PLACEHOLDER: &str = "${count}";

/// Path variable: directory of the input log.
pub const VAR_FILE_DIR_NAME: &str = "${fileDirname}";

/// Path variable: file name of the input log.
pub const VAR_FILE_BASENAME: &str = "${fileBasename}";

/// Path variable: file name of the input log without its extension.
pub const VAR_FILE_BASENAME_NO_EXT: &str = "${fileBasenameNoExtension}";

/// Output file template used when `translation_file` is not configured.
pub const DEFAULT_TRANSLATION_FILE: &str = "${fileDirname}/${fileBasename}.txt";

// =============================================================================
// File handling
// =============================================================================

/// Suffix of the scratch file written while rewriting a log in place.
pub const TRIM_FILE_SUFFIX: &str = ".trim.log";

/// Log files above this size are read through a memory map.
pub const LARGE_LOG_THRESHOLD: u64 = 64 * 1024 * 1024; // 64 MB

// =============================================================================
// Diagram rendering
// =============================================================================

/// Java executable used for the PlantUML render step by default.
pub const DEFAULT_JAVA: &str = "java";

/// Translations shorter than this many lines use the small PlantUML canvas.
pub const PLANTUML_SMALL_DIAGRAM_LINES: usize = 100;

/// `PLANTUML_LIMIT_SIZE` for small diagrams.
pub const PLANTUML_LIMIT_SMALL: u32 = 32_768;

/// `PLANTUML_LIMIT_SIZE` for large diagrams.
pub const PLANTUML_LIMIT_LARGE: u32 = 65_536;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Maximum length of a log line included in debug output.
/// Prevents accidental exposure of sensitive data in long lines.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Application settings file name.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Maximum size of the settings file in bytes.
pub const MAX_SETTINGS_FILE_SIZE: u64 = 64 * 1024; // 64 KB

// =============================================================================
// Process exit codes
// =============================================================================

/// Generic failure.
pub const EXIT_FAILURE: i32 = 1;

/// An input file (log or rule configuration) could not be read.
pub const EXIT_IO: i32 = 2;

/// The rule configuration is malformed.
pub const EXIT_CONFIG: i32 = 3;
