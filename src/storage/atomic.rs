//! Atomic file replacement shared by the stores
//!
//! Content goes to a sibling temp file under an exclusive lock, then the
//! temp file is renamed over the target.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{GtdError, Result};

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("gtd"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replaces the file at `path` with `content`
pub fn replace_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| GtdError::io(parent, e))?;
    }

    let temp = temp_path(path);
    let written = write_locked(&temp, content)
        .and_then(|_| fs::rename(&temp, path).map_err(|e| GtdError::io(path, e)));

    if written.is_err() {
        let _ = fs::remove_file(&temp);
    }
    written
}

fn write_locked(temp: &Path, content: &str) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp)
        .map_err(|e| GtdError::io(temp, e))?;

    file.lock_exclusive().map_err(|e| GtdError::io(temp, e))?;

    let mut writer = BufWriter::new(&file);
    writer
        .write_all(content.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| GtdError::io(temp, e))?;
    Ok(())
}

/// Reads a file, treating a missing file as empty
pub fn read_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(GtdError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn replaces_content_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gtd.org");
        fs::write(&path, "old").unwrap();

        replace_file(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("dir").join("gtd.jsonl");

        replace_file(&path, "{}\n").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gtd.org");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inside"), "x").unwrap();

        // A file cannot be renamed over a non-empty directory
        let err = replace_file(&path, "new").unwrap_err();
        assert!(matches!(err, GtdError::Io { .. }));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_or_empty(&dir.path().join("absent.org")).unwrap(), "");
    }
}
