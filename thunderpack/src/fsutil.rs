//! Shared filesystem helpers.
//!
//! Persisted state (ledger, manifest, changelog, snapshot cache) is always
//! replaced atomically: content is written to a sibling temp file which is
//! then renamed over the destination. A crashed process never leaves a
//! half-written file behind.

use std::fs;
use std::io;
use std::path::Path;

/// Atomically replace `path` with `contents`.
///
/// Writes to `<path>.tmp` in the same directory and renames it into place.
/// The parent directory is created if it does not exist.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");

        write_atomic(&path, "{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");

        write_atomic(&path, "old").unwrap();
        write_atomic(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_atomic_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/state.json");

        write_atomic(&path, "content").unwrap();

        assert!(path.exists());
    }
}
