//! Content digest of the tracked config folder.
//!
//! The digest covers relative file paths and file contents, walked in
//! sorted order so the result is stable across platforms and directory
//! enumeration order.

use std::fs;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::error::{ManifestError, ManifestResult};

/// Buffer size for hashing file contents (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Compute a stable SHA-256 digest of a directory's contents.
pub fn directory_digest(dir: &Path) -> ManifestResult<String> {
    let mut hasher = Sha256::new();
    hash_dir(dir, dir, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

fn hash_dir(root: &Path, dir: &Path, hasher: &mut Sha256) -> ManifestResult<()> {
    let io_err = |e| ManifestError::DigestFailed {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(io_err)?
        .collect::<Result<_, _>>()
        .map_err(io_err)?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            hash_dir(root, &path, hasher)?;
        } else {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            hasher.update(relative.to_string_lossy().as_bytes());
            hash_file(&path, hasher)?;
        }
    }
    Ok(())
}

fn hash_file(path: &Path, hasher: &mut Sha256) -> ManifestResult<()> {
    let io_err = |e| ManifestError::DigestFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = fs::File::open(path).map_err(io_err)?;
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(io_err)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_digest_is_stable() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.cfg"), "one").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/b.cfg"), "two").unwrap();

        let first = directory_digest(temp.path()).unwrap();
        let second = directory_digest(temp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_digest_changes_with_content() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.cfg"), "one").unwrap();
        let before = directory_digest(temp.path()).unwrap();

        fs::write(temp.path().join("a.cfg"), "changed").unwrap();
        let after = directory_digest(temp.path()).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn test_digest_changes_with_filename() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.cfg"), "one").unwrap();
        let before = directory_digest(temp.path()).unwrap();

        fs::rename(temp.path().join("a.cfg"), temp.path().join("b.cfg")).unwrap();
        let after = directory_digest(temp.path()).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn test_digest_of_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        let result = directory_digest(&temp.path().join("nope"));
        assert!(matches!(result, Err(ManifestError::DigestFailed { .. })));
    }
}
