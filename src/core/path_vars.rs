// Logalizer - core/path_vars.rs
//
// Expansion of ${fileDirname}, ${fileBasename} and
// ${fileBasenameNoExtension} in configured paths and commands.

use crate::util::constants::{VAR_FILE_BASENAME, VAR_FILE_BASENAME_NO_EXT, VAR_FILE_DIR_NAME};
use std::path::Path;

/// Path components of the input log used for variable expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathVariables {
    pub dir: String,
    pub file: String,
    pub file_no_ext: String,
}

impl PathVariables {
    /// Derive the variables from the input log path.
    ///
    /// A bare file name has directory ".".
    pub fn from_log_path(path: &Path) -> Self {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
            _ => ".".to_string(),
        };
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_no_ext = path
            .file_stem()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            dir,
            file,
            file_no_ext,
        }
    }

    /// Replace every path variable occurrence in `input`.
    pub fn expand(&self, input: &str) -> String {
        // The no-extension variable shares a prefix with ${fileBasename}
        // but not its closing brace, so the order is irrelevant.
        input
            .replace(VAR_FILE_DIR_NAME, &self.dir)
            .replace(VAR_FILE_BASENAME_NO_EXT, &self.file_no_ext)
            .replace(VAR_FILE_BASENAME, &self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_nested_path() {
        let vars = PathVariables::from_log_path(Path::new("traces/run1/trace.log"));
        assert_eq!(vars.dir, "traces/run1");
        assert_eq!(vars.file, "trace.log");
        assert_eq!(vars.file_no_ext, "trace");
    }

    #[test]
    fn test_bare_file_name_uses_current_dir() {
        let vars = PathVariables::from_log_path(Path::new("trace.log"));
        assert_eq!(vars.dir, ".");
    }

    #[test]
    fn test_expand_all_variables() {
        let vars = PathVariables::from_log_path(Path::new("logs/trace.log"));
        let expanded =
            vars.expand("${fileDirname}/${fileBasenameNoExtension}/${fileBasename}_seq.txt");
        assert_eq!(expanded, "logs/trace/trace.log_seq.txt");
    }

    #[test]
    fn test_expand_repeated_variable() {
        let vars = PathVariables::from_log_path(Path::new("a/b.log"));
        assert_eq!(vars.expand("${fileBasename} ${fileBasename}"), "b.log b.log");
    }
}
