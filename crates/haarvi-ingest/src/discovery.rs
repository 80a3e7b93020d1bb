//! Export discovery in the download directory.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::error::{IngestError, Result};

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        // Check for .csv extension (case-insensitive)
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            files.push(path);
        }
    }

    // Sort by filename
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Returns the most recently created CSV file in `dir`.
///
/// Creation time falls back to modification time on platforms that do not
/// record it. The chosen file must start with `prefix`; a newer file with a
/// different name means the download directory holds something other than
/// the expected export, and the run stops rather than guess.
///
/// Files whose name starts with any entry of `ignored` are never
/// candidates; the scheduler's own outputs and the appointment log live in
/// the same directory.
pub fn latest_export(dir: &Path, prefix: &str, ignored: &[&str]) -> Result<PathBuf> {
    let files = list_csv_files(dir)?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for path in files {
        let skip = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| ignored.iter().any(|ignore| name.starts_with(ignore)));
        if skip {
            debug!(path = %path.display(), "ignoring non-export CSV");
            continue;
        }
        let stamp = file_timestamp(&path)?;
        debug!(path = %path.display(), ?stamp, "export candidate");
        // Files are visited in name order, so ties keep the last name.
        if latest.as_ref().is_none_or(|(best, _)| stamp >= *best) {
            latest = Some((stamp, path));
        }
    }

    let Some((_, path)) = latest else {
        return Err(IngestError::NoExportFound {
            path: dir.to_path_buf(),
        });
    };

    let matches_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(prefix));
    if !matches_prefix {
        return Err(IngestError::UnexpectedExportName {
            path,
            expected_prefix: prefix.to_string(),
        });
    }

    Ok(path)
}

fn file_timestamp(path: &Path) -> Result<SystemTime> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        for name in &["b_export.csv", "a_export.CSV", "notes.txt"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "header\ndata").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        dir
    }

    #[test]
    fn test_list_csv_files() {
        let dir = create_test_dir();
        let files = list_csv_files(dir.path()).unwrap();

        assert_eq!(files.len(), 2);
        // Sorted by filename, extension matched case-insensitively
        assert!(files[0].ends_with("a_export.CSV"));
        assert!(files[1].ends_with("b_export.csv"));
    }

    #[test]
    fn test_list_csv_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.csv");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_csv_files(&file_path);
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_latest_export_empty_dir() {
        let dir = TempDir::new().unwrap();
        let result = latest_export(dir.path(), "HAARVI", &[]);
        assert!(matches!(result, Err(IngestError::NoExportFound { .. })));
    }
}
