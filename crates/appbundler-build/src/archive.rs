use std::io::Write;
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Zips the contents of `build_dir` into `<package>.zip` and moves the
/// archive inside `build_dir`.
///
/// The archive is written next to `build_dir` first so it does not include
/// itself; an archive left inside `build_dir` by an earlier run is skipped.
/// Entry names are relative to `build_dir` and use `/`.
pub fn create_archive(build_dir: &Path, package: &str) -> Result<PathBuf, ArchiveError> {
    let file_name = format!("{package}.zip");
    let parent = build_dir
        .parent()
        .ok_or_else(|| ArchiveError::NoParent(build_dir.to_path_buf()))?;
    let staging = parent.join(&file_name);
    let final_path = build_dir.join(&file_name);

    write_zip(build_dir, &staging, &final_path)?;

    std::fs::rename(&staging, &final_path).map_err(|e| ArchiveError::Move {
        from: staging.clone(),
        to: final_path.clone(),
        source: e,
    })?;

    tracing::info!(path = %final_path.display(), "archive created");
    Ok(final_path)
}

fn write_zip(root: &Path, zip_path: &Path, skip: &Path) -> Result<(), ArchiveError> {
    let file = std::fs::File::create(zip_path).map_err(|e| ArchiveError::Io {
        path: zip_path.to_path_buf(),
        source: e,
    })?;
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in walkdir::WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ArchiveError::Walk {
            path: root.to_path_buf(),
            source: e,
        })?;
        if entry.path() == skip {
            continue;
        }
        let name = entry_name(root, entry.path())?;

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)
                .map_err(|e| ArchiveError::Zip {
                    path: entry.path().to_path_buf(),
                    source: e,
                })?;
            continue;
        }

        zip.start_file(name, options)
            .map_err(|e| ArchiveError::Zip {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
        let content = std::fs::read(entry.path()).map_err(|e| ArchiveError::Io {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        zip.write_all(&content).map_err(|e| ArchiveError::Io {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
    }

    zip.finish().map_err(|e| ArchiveError::Zip {
        path: zip_path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

fn entry_name(root: &Path, path: &Path) -> Result<String, ArchiveError> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| ArchiveError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    parts
        .map(|p| p.join("/"))
        .ok_or_else(|| ArchiveError::NonUtf8Name(path.to_path_buf()))
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("build directory {0} has no parent to stage the archive in")]
    NoParent(PathBuf),

    #[error("failed to walk {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("{path} is not inside {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("cannot store {0} in the archive: name is not valid UTF-8")]
    NonUtf8Name(PathBuf),

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write archive entry {path}")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("failed to move archive from {from} to {to}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}
