use std::path::{Path, PathBuf};

/// Describes one set of supplemental data to copy into a bundle.
///
/// A `DataSpec` is only a description; `appbundler_build::SupplementalData`
/// checks it against the filesystem and resolves the concrete locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSpec {
    pub base_directory: PathBuf,
    /// Paths relative to `base_directory`. Leading slashes are ignored.
    pub sub_directories: Option<Vec<String>>,
    /// Glob applied below each candidate root.
    pub pattern: Option<String>,
    pub recursive: bool,
    pub flatten: bool,
    /// Name of the directory inside the build directory that receives the
    /// data. Falls back to the last component of `base_directory`.
    pub target: Option<String>,
}

impl DataSpec {
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
            sub_directories: None,
            pattern: None,
            recursive: false,
            flatten: false,
            target: None,
        }
    }

    pub fn sub_directories<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_directories = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Directory name the data lands in under the build directory.
    pub fn target_name(&self) -> String {
        if let Some(target) = &self.target {
            return target.clone();
        }
        target_from_base(&self.base_directory)
    }
}

fn target_from_base(base: &Path) -> String {
    base.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_owned())
}
