// Logalizer - platform/config.rs
//
// Platform directory resolution and settings.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for Logalizer configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logalizer/ or %APPDATA%\Logalizer\config\)
    pub config_dir: PathBuf,

    /// Default location of settings.toml.
    pub settings_file: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be
    /// determined. Runs before logging is initialised, so the fallback is
    /// reported as a warning for the caller to log.
    pub fn resolve() -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let config_dir = match ProjectDirs::from("", "", constants::APP_ID) {
            Some(proj_dirs) => proj_dirs.config_dir().to_path_buf(),
            None => {
                warnings.push(
                    "Could not determine platform directories, using current directory"
                        .to_string(),
                );
                PathBuf::from(".")
            }
        };
        (Self::in_dir(config_dir), warnings)
    }

    /// Paths rooted at an explicit configuration directory.
    pub fn in_dir(config_dir: PathBuf) -> Self {
        let settings_file = config_dir.join(constants::SETTINGS_FILE_NAME);
        Self {
            config_dir,
            settings_file,
        }
    }
}

// =============================================================================
// settings.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of settings.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawSettings {
    pub logging: LoggingSection,
    pub render: RenderSection,
    pub translation: TranslationSection,
}

/// `[logging]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// `[render]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RenderSection {
    /// Java executable for the PlantUML step.
    pub java: Option<String>,
    /// Default PlantUML jar when `-p` is not given.
    pub plantuml_jar: Option<String>,
}

/// `[translation]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TranslationSection {
    /// Rule configuration used when `-c` is not given.
    pub config_file: Option<String>,
}

/// Validated application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub java: String,
    pub plantuml_jar: Option<PathBuf>,
    pub config_file: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: None,
            log_file: None,
            java: constants::DEFAULT_JAVA.to_string(),
            plantuml_jar: None,
            config_file: PathBuf::from(constants::DEFAULT_RULE_CONFIG_FILE),
        }
    }
}

/// Load and validate settings from `path`.
///
/// Returns validated settings and a list of non-fatal warnings. A missing
/// file yields defaults unless `required` is set (the path was named on the
/// command line). Unreadable, oversized or unparseable files are errors.
///
/// Runs before logging is initialised, so warnings are returned rather
/// than logged.
pub fn load_settings(
    path: &Path,
    required: bool,
) -> Result<(AppSettings, Vec<String>), ConfigError> {
    let io_err = |e: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            return Ok((AppSettings::default(), Vec::new()));
        }
        Err(e) => return Err(io_err(e)),
    };

    if metadata.len() > constants::MAX_SETTINGS_FILE_SIZE {
        return Err(ConfigError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: constants::MAX_SETTINGS_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(io_err)?;
    parse_settings(&content, path)
}

/// Parse and validate settings.toml content.
pub fn parse_settings(
    content: &str,
    path: &Path,
) -> Result<(AppSettings, Vec<String>), ConfigError> {
    let raw: RawSettings = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut settings = AppSettings::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            settings.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file.filter(|f| !f.is_empty()) {
        settings.log_file = Some(PathBuf::from(file));
    }

    // -- Render: java --
    if let Some(java) = raw.render.java {
        if java.trim().is_empty() {
            warnings.push(format!(
                "[render] java is empty. Using default ({}).",
                constants::DEFAULT_JAVA
            ));
        } else {
            settings.java = java;
        }
    }

    // -- Render: plantuml_jar --
    if let Some(jar) = raw.render.plantuml_jar.filter(|j| !j.is_empty()) {
        settings.plantuml_jar = Some(PathBuf::from(jar));
    }

    // -- Translation: config_file --
    if let Some(config_file) = raw.translation.config_file {
        if config_file.trim().is_empty() {
            warnings.push(format!(
                "[translation] config_file is empty. Using default ({}).",
                constants::DEFAULT_RULE_CONFIG_FILE
            ));
        } else {
            settings.config_file = PathBuf::from(config_file);
        }
    }

    Ok((settings, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> (AppSettings, Vec<String>) {
        parse_settings(content, Path::new("settings.toml")).unwrap()
    }

    #[test]
    fn test_settings_file_lives_in_config_dir() {
        let paths = PlatformPaths::in_dir(PathBuf::from("/etc/logalizer"));
        assert_eq!(paths.settings_file, PathBuf::from("/etc/logalizer/settings.toml"));

        let (resolved, warnings) = PlatformPaths::resolve();
        assert_eq!(
            resolved.settings_file,
            resolved.config_dir.join(constants::SETTINGS_FILE_NAME)
        );
        assert!(warnings.len() <= 1);
    }

    #[test]
    fn test_empty_settings_are_defaults() {
        let (settings, warnings) = parse("");
        assert_eq!(settings, AppSettings::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_all_sections_read() {
        let (settings, warnings) = parse(
            r#"
            [logging]
            level = "DEBUG"
            file = "/tmp/logalizer.log"

            [render]
            java = "/opt/jdk/bin/java"
            plantuml_jar = "tools/plantuml.jar"

            [translation]
            config_file = "rules/trace.json"
            "#,
        );
        assert!(warnings.is_empty());
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/logalizer.log")));
        assert_eq!(settings.java, "/opt/jdk/bin/java");
        assert_eq!(settings.plantuml_jar, Some(PathBuf::from("tools/plantuml.jar")));
        assert_eq!(settings.config_file, PathBuf::from("rules/trace.json"));
    }

    #[test]
    fn test_invalid_level_warns_and_defaults() {
        let (settings, warnings) = parse("[logging]\nlevel = \"loud\"\n");
        assert!(settings.log_level.is_none());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("loud"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (settings, warnings) = parse("[future]\nflag = true\n[render]\ncolour = \"red\"\n");
        assert_eq!(settings, AppSettings::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let err = parse_settings("[logging\nlevel=", Path::new("settings.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse { .. }));
    }

    #[test]
    fn test_missing_default_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let (settings, warnings) =
            load_settings(&dir.path().join("settings.toml"), false).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_required_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = load_settings(&dir.path().join("settings.toml"), true).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        let padding = "#".repeat(constants::MAX_SETTINGS_FILE_SIZE as usize + 1);
        std::fs::write(&path, padding).unwrap();
        let err = load_settings(&path, false).unwrap_err();
        assert!(matches!(err, ConfigError::FileTooLarge { .. }));
    }
}
