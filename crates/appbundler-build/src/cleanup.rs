use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "__pycache__";
const BYTECODE_EXTENSIONS: &[&str] = &["pyc", "pyo"];

/// What [`remove_bytecode`] deleted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl CleanupReport {
    pub fn total(&self) -> usize {
        self.directories.len() + self.files.len()
    }
}

/// Removes `__pycache__` directories and compiled bytecode files anywhere
/// under `root`.
pub fn remove_bytecode(root: &Path) -> Result<CleanupReport, CleanupError> {
    let mut report = CleanupReport::default();

    // Collect first; deleting while walking would invalidate the iterator.
    let walker = walkdir::WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // A cache directory is deleted whole, so its contents need no visit.
            !(e.depth() > 1 && e.path().parent().is_some_and(is_cache_dir))
        });

    for entry in walker {
        let entry = entry.map_err(|e| CleanupError::Walk {
            path: root.to_path_buf(),
            source: e,
        })?;
        if entry.file_type().is_dir() {
            if is_cache_dir(entry.path()) {
                report.directories.push(entry.into_path());
            }
        } else if is_bytecode(entry.path()) {
            report.files.push(entry.into_path());
        }
    }

    for dir in &report.directories {
        tracing::info!(path = %dir.display(), "deleting");
        std::fs::remove_dir_all(dir).map_err(|e| CleanupError::Remove {
            path: dir.clone(),
            source: e,
        })?;
    }
    for file in &report.files {
        tracing::info!(path = %file.display(), "deleting");
        std::fs::remove_file(file).map_err(|e| CleanupError::Remove {
            path: file.clone(),
            source: e,
        })?;
    }

    Ok(report)
}

fn is_cache_dir(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == CACHE_DIR_NAME)
}

fn is_bytecode(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| BYTECODE_EXTENSIONS.contains(&e))
}

#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("failed to walk {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("failed to delete {path}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}
