// Logalizer - platform/fs.rs
//
// Filesystem helpers: lossy log reading, backups, output file creation and
// the in-place log rewrite.

use crate::util::constants;
use crate::util::error::OutputError;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry limits for transient I/O errors.
const MAX_RETRIES: u32 = 3;
const RETRY_DELAYS_MS: [u64; 3] = [50, 100, 200];

/// Read a whole file as text, replacing invalid UTF-8.
///
/// Files above `LARGE_LOG_THRESHOLD` are memory-mapped instead of copied
/// into a heap buffer first.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let size = fs::metadata(path)?.len();
    if size > constants::LARGE_LOG_THRESHOLD {
        tracing::debug!(file = %path.display(), size, "Reading large file through mmap");
        read_mapped(path)
    } else {
        read_with_retry(path)
    }
}

/// Read a file and split it into lines (`\n` or `\r\n`).
pub fn read_lines_lossy(path: &Path) -> io::Result<Vec<String>> {
    let content = read_file_lossy(path)?;
    Ok(content.lines().map(str::to_string).collect())
}

fn read_mapped(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    // SAFETY: the map is read-only and dropped before returning. A log
    // truncated by another process while mapped can fault; callers accept
    // that for input files they own.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    Ok(String::from_utf8_lossy(&mmap).into_owned())
}

fn read_with_retry(path: &Path) -> io::Result<String> {
    let mut last_err: Option<io::Error> = None;

    for attempt in 0..MAX_RETRIES {
        match fs::read(path) {
            Ok(bytes) => return Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if is_transient_error(&e) => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                std::thread::sleep(Duration::from_millis(RETRY_DELAYS_MS[attempt as usize]));
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or_else(|| io::Error::other("Unknown read error")))
}

fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| OutputError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
            tracing::debug!(dir = %parent.display(), "Created output directory");
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Create (or truncate) an output file, creating its directory first.
pub fn create_output_file(path: &Path) -> Result<BufWriter<File>, OutputError> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| OutputError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Copy `original` to `backup` unless a backup already exists.
///
/// Returns `true` if a copy was made. An existing backup is never
/// overwritten, so repeated runs keep the untouched first copy.
pub fn backup_if_absent(original: &Path, backup: &Path) -> Result<bool, OutputError> {
    if backup.exists() {
        tracing::debug!(backup = %backup.display(), "Backup already present; keeping it");
        return Ok(false);
    }
    ensure_parent_dir(backup)?;
    fs::copy(original, backup).map_err(|e| OutputError::Backup {
        original: original.to_path_buf(),
        backup: backup.to_path_buf(),
        source: e,
    })?;
    tracing::info!(
        original = %original.display(),
        backup = %backup.display(),
        "Original log backed up"
    );
    Ok(true)
}

/// Sibling scratch path used while rewriting `path`.
pub fn trim_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(constants::TRIM_FILE_SUFFIX);
    PathBuf::from(name)
}

/// Replace the contents of `path` with `lines`, one per line.
///
/// The lines are written to the `.trim.log` sibling first, which is then
/// renamed over the original. On any failure the scratch file is removed
/// and the original is left as it was.
pub fn rewrite_in_place(path: &Path, lines: &[String]) -> Result<(), OutputError> {
    let scratch = trim_path(path);

    let result = write_lines(&scratch, lines).and_then(|()| fs::rename(&scratch, path));
    if let Err(e) = result {
        if let Err(cleanup) = fs::remove_file(&scratch) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    file = %scratch.display(),
                    error = %cleanup,
                    "Cannot remove scratch file"
                );
            }
        }
        return Err(OutputError::Rewrite {
            path: path.to_path_buf(),
            source: e,
        });
    }

    tracing::debug!(file = %path.display(), lines = lines.len(), "Log rewritten in place");
    Ok(())
}

fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
