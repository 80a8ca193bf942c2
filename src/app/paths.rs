//! Filesystem path validation
//!
//! Stateless predicates over destination paths: existence, usability in
//! read/write mode, and the absence check backing skip-if-present decisions.
//! An existing destination file IS the resume state, so these checks are the
//! only coordination downloads need.

use std::path::{Path, PathBuf};

/// Expand a possibly-relative path to an absolute one, resolving symlinks
///
/// Falls back to prefixing the current directory when the path does not
/// exist yet (canonicalization requires an existing target).
pub fn full_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Check that a path exists and is usable
///
/// A file must be readable and writable; a directory merely has to exist.
pub fn is_valid(path: &Path) -> bool {
    let Ok(metadata) = path.metadata() else {
        return false;
    };
    if metadata.is_file() {
        // Opening for read-write is the portable readable+writable probe
        return std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .is_ok();
    }
    metadata.is_dir()
}

/// Check that nothing exists at a path yet (the "strict" mode)
///
/// This is the skip-if-present predicate: a present file means the download
/// already completed in an earlier run.
pub fn is_absent(path: &Path) -> bool {
    !path.exists()
}
