//! Small filesystem helpers shared by the copy steps.

use std::path::{Path, PathBuf};

/// Copies `src` to `dst`, creating parent directories and overwriting an
/// existing file.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), CopyError> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CopyError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::copy(src, dst).map_err(|e| CopyError::CopyFile {
        path: src.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Mirrors the directory `from` into `to`, following symlinks.
///
/// Returns the destination paths of the copied files.
pub fn copy_tree(from: &Path, to: &Path) -> Result<Vec<PathBuf>, CopyError> {
    let mut written = Vec::new();
    for entry in walkdir::WalkDir::new(from)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| CopyError::Walk {
            path: from.to_path_buf(),
            source: e,
        })?;
        let rel = entry
            .path()
            .strip_prefix(from)
            .map_err(|_| CopyError::OutsideRoot {
                path: entry.path().to_path_buf(),
                root: from.to_path_buf(),
            })?;
        let dst = to.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dst).map_err(|e| CopyError::CreateDir {
                path: dst.clone(),
                source: e,
            })?;
        } else {
            copy_file(entry.path(), &dst)?;
            written.push(dst);
        }
    }
    Ok(written)
}

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("failed to walk {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy file {path}")]
    CopyFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not inside {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}
