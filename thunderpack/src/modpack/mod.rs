//! Modpack project packaging and scaffolding.
//!
//! A modpack project directory ships three required files: `manifest.json`,
//! `README.md`, and `icon.png`. Packing verifies all three exist, reads the
//! pack name from the manifest, and zips the directory into
//! `<dist>/<name>.zip`, ready for upload.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::manifest::{Manifest, ManifestError};

/// Result type for modpack operations.
pub type ModpackResult<T> = Result<T, ModpackError>;

/// Errors that can occur while packing or scaffolding a modpack project.
#[derive(Debug, Error)]
pub enum ModpackError {
    /// A required project file is missing.
    #[error("modpack project is missing required file {name} (looked in {dir})")]
    MissingFile { name: &'static str, dir: PathBuf },

    /// The project manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The project directory could not be walked.
    #[error("failed to read modpack directory {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    /// The archive could not be written.
    #[error("failed to write modpack archive {path}: {source}")]
    ArchiveFailed { path: PathBuf, source: io::Error },

    /// A project folder or file could not be created.
    #[error("failed to scaffold {path}: {source}")]
    ScaffoldFailed { path: PathBuf, source: io::Error },
}

/// Files every uploadable modpack project must contain.
const REQUIRED_FILES: [&str; 3] = ["manifest.json", "README.md", "icon.png"];

/// Zip the modpack project at `project_dir` into `dist_dir/<name>.zip`.
///
/// The pack name comes from the project's `manifest.json`. The dist
/// directory is created if needed and an existing archive of the same name
/// is overwritten. Returns the path of the written archive.
pub fn pack(project_dir: &Path, dist_dir: &Path) -> ModpackResult<PathBuf> {
    for name in REQUIRED_FILES {
        if !project_dir.join(name).exists() {
            return Err(ModpackError::MissingFile {
                name,
                dir: project_dir.to_path_buf(),
            });
        }
    }

    let manifest_path = project_dir.join("manifest.json");
    let manifest = Manifest::load(&manifest_path)?.ok_or(ModpackError::MissingFile {
        name: "manifest.json",
        dir: project_dir.to_path_buf(),
    })?;

    fs::create_dir_all(dist_dir).map_err(|e| ModpackError::ArchiveFailed {
        path: dist_dir.to_path_buf(),
        source: e,
    })?;

    let archive_path = dist_dir.join(format!("{}.zip", manifest.name));
    let archive_err = |e| ModpackError::ArchiveFailed {
        path: archive_path.clone(),
        source: e,
    };

    let file = fs::File::create(&archive_path).map_err(archive_err)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let mut count = 0usize;
    zip_dir(&mut writer, project_dir, project_dir, options, &mut count)?;
    writer
        .finish()
        .map_err(|e| archive_err(io::Error::other(e)))?;

    info!(
        archive = %archive_path.display(),
        files = count,
        "modpack archive written"
    );
    Ok(archive_path)
}

fn zip_dir(
    writer: &mut ZipWriter<fs::File>,
    root: &Path,
    dir: &Path,
    options: SimpleFileOptions,
    count: &mut usize,
) -> ModpackResult<()> {
    let read_err = |e| ModpackError::ReadFailed {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(read_err)?
        .collect::<Result<_, _>>()
        .map_err(read_err)?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        // Archive entry names use forward slashes regardless of platform.
        let name = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if path.is_dir() {
            zip_dir(writer, root, &path, options, count)?;
        } else {
            debug!(entry = %name, "adding to modpack archive");
            add_file(writer, &path, &name, options)?;
            *count += 1;
        }
    }
    Ok(())
}

fn add_file(
    writer: &mut ZipWriter<fs::File>,
    path: &Path,
    name: &str,
    options: SimpleFileOptions,
) -> ModpackResult<()> {
    let archive_err = |e| ModpackError::ArchiveFailed {
        path: path.to_path_buf(),
        source: e,
    };

    writer
        .start_file(name, options)
        .map_err(|e| archive_err(io::Error::other(e)))?;

    let mut file = fs::File::open(path).map_err(archive_err)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(archive_err)?;
    writer.write_all(&contents).map_err(archive_err)?;
    Ok(())
}

/// Create the modpack project directory and a starter `README.md` when they
/// do not exist yet. An existing README is never overwritten.
pub fn scaffold(project_dir: &Path, name: &str, description: &str) -> ModpackResult<()> {
    fs::create_dir_all(project_dir).map_err(|e| ModpackError::ScaffoldFailed {
        path: project_dir.to_path_buf(),
        source: e,
    })?;

    let readme_path = project_dir.join("README.md");
    if readme_path.exists() {
        return Ok(());
    }

    let readme = format!("# {}\n\n{}\n", name, description);
    fs::write(&readme_path, readme).map_err(|e| ModpackError::ScaffoldFailed {
        path: readme_path.clone(),
        source: e,
    })?;

    info!(path = %readme_path.display(), "scaffolded project README");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;
    use tempfile::TempDir;

    fn project(temp: &TempDir, name: &str) -> PathBuf {
        let dir = temp.path().join("modpack");
        fs::create_dir_all(&dir).unwrap();

        let manifest = Manifest {
            name: name.to_string(),
            version_number: Version::new(1, 0, 0),
            website_url: String::new(),
            description: "A pack".to_string(),
            dependencies: vec!["alice-ExampleMod-1.0.0".to_string()],
        };
        manifest.save(&dir.join("manifest.json")).unwrap();
        fs::write(dir.join("README.md"), "# ExamplePack\n").unwrap();
        fs::write(dir.join("icon.png"), [0u8; 16]).unwrap();
        dir
    }

    #[test]
    fn test_pack_writes_named_archive() {
        let temp = TempDir::new().unwrap();
        let project_dir = project(&temp, "ExamplePack");
        let dist = temp.path().join("dist");

        let archive = pack(&project_dir, &dist).unwrap();

        assert_eq!(archive, dist.join("ExamplePack.zip"));
        assert!(archive.exists());
    }

    #[test]
    fn test_pack_archive_contains_project_files() {
        let temp = TempDir::new().unwrap();
        let project_dir = project(&temp, "ExamplePack");
        fs::create_dir(project_dir.join("config")).unwrap();
        fs::write(project_dir.join("config/mod.cfg"), "key=1").unwrap();

        let archive = pack(&project_dir, &temp.path().join("dist")).unwrap();

        let mut zip = zip::ZipArchive::new(fs::File::open(archive).unwrap()).unwrap();
        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"manifest.json".to_string()));
        assert!(names.contains(&"README.md".to_string()));
        assert!(names.contains(&"icon.png".to_string()));
        assert!(names.contains(&"config/mod.cfg".to_string()));
    }

    #[test]
    fn test_pack_rejects_missing_required_file() {
        let temp = TempDir::new().unwrap();
        let project_dir = project(&temp, "ExamplePack");
        fs::remove_file(project_dir.join("icon.png")).unwrap();

        let result = pack(&project_dir, &temp.path().join("dist"));

        assert!(matches!(
            result,
            Err(ModpackError::MissingFile { name: "icon.png", .. })
        ));
    }

    #[test]
    fn test_scaffold_creates_readme_once() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("modpack");

        scaffold(&dir, "ExamplePack", "A pack").unwrap();
        let readme_path = dir.join("README.md");
        assert_eq!(
            fs::read_to_string(&readme_path).unwrap(),
            "# ExamplePack\n\nA pack\n"
        );

        fs::write(&readme_path, "hand-edited").unwrap();
        scaffold(&dir, "ExamplePack", "A pack").unwrap();
        assert_eq!(fs::read_to_string(&readme_path).unwrap(), "hand-edited");
    }
}
