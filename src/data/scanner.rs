// ============================================================
// Layer 4 — Filesystem Scanner
// ============================================================
// Lists the files directly inside a corpus directory.
//
//   corpus/
//     news_01.txt      ← returned
//     news_02.txt      ← returned
//     archive/         ← skipped, never traversed
//
// Order is whatever fs::read_dir yields. It is stable within
// one process run on one filesystem but differs across
// platforms, so nothing downstream may depend on it for
// correctness.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{PipelineError, PipelineResult};

/// Return the full paths of all non-directory entries under `dir`.
///
/// Fails if the directory is missing or cannot be listed.
pub fn scan_files(dir: impl AsRef<Path>) -> PipelineResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))? {
        let path = entry.map_err(|e| PipelineError::io(dir, e))?.path();

        // is_dir follows symlinks, so a link to a directory is skipped too
        if path.is_dir() {
            continue;
        }
        files.push(path);
    }

    tracing::debug!("Scanned {} files under '{}'", files.len(), dir.display());
    Ok(files)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_returns_files_and_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b"), "b").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), "c").unwrap();

        let found: HashSet<PathBuf> = scan_files(dir.path()).unwrap().into_iter().collect();
        let expected: HashSet<PathBuf> =
            [dir.path().join("a.txt"), dir.path().join("b")].into_iter().collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir     = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(scan_files(&missing), Err(PipelineError::Io { .. })));
    }
}
