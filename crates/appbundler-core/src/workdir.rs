use std::path::{Path, PathBuf};

/// Changes the process working directory for as long as the guard lives.
///
/// The previous directory is restored on drop, including when the scope is
/// left through `?` or a panic. The working directory is process-wide, so
/// only one guard should be active at a time.
#[derive(Debug)]
#[must_use = "the original directory is restored as soon as the guard is dropped"]
pub struct ScopedDir {
    original: PathBuf,
}

impl ScopedDir {
    pub fn enter(path: &Path) -> crate::Result<Self> {
        let original =
            std::env::current_dir().map_err(|e| crate::Error::CurrentDir { source: e })?;
        std::env::set_current_dir(path).map_err(|e| crate::Error::ChangeDir {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(
            from = %original.display(),
            to = %path.display(),
            "entered working directory"
        );
        Ok(Self { original })
    }

    /// Directory that will be restored on drop.
    pub fn original(&self) -> &Path {
        &self.original
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.original) {
            tracing::error!(
                path = %self.original.display(),
                error = %e,
                "failed to restore working directory"
            );
        }
    }
}
